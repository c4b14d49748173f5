//! In-memory host used by the CLI and the tests. It keeps a record of every
//! request the session makes so callers can inspect what a browser would
//! have shown.

use std::time::SystemTime;

use outline_core::Msg;
use outline_logging::outline_debug;

use crate::reconcile::{EntryWidget, RenderTarget};
use crate::{Document, HostPage, NodeHandle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    visible: bool,
    content_visible: bool,
    attached: bool,
    widgets: Vec<EntryWidget>,
    placeholder: Option<String>,
    renders: usize,
}

impl Panel {
    fn new() -> Self {
        Self {
            visible: true,
            content_visible: true,
            attached: true,
            widgets: Vec::new(),
            placeholder: None,
            renders: 0,
        }
    }

    pub fn widgets(&self) -> &[EntryWidget] {
        &self.widgets
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_content_visible(&self) -> bool {
        self.content_visible
    }

    /// Number of times the content was cleared and redrawn.
    pub fn render_count(&self) -> usize {
        self.renders
    }
}

impl RenderTarget for Panel {
    fn is_attached(&self) -> bool {
        self.attached
    }

    fn clear(&mut self) {
        self.widgets.clear();
        self.placeholder = None;
        self.renders += 1;
    }

    fn push_entry(&mut self, widget: EntryWidget) {
        self.widgets.push(widget);
    }

    fn show_placeholder(&mut self, text: &str) {
        self.placeholder = Some(text.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub anchor_id: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Click,
    Enter,
    Leave,
}

pub struct VirtualPage {
    document: Document,
    panel: Option<Panel>,
    panels_created: usize,
    tooltip: Option<Tooltip>,
    tooltips_shown: usize,
    highlighted: Option<NodeHandle>,
    scrolled: Vec<NodeHandle>,
    clock: Option<SystemTime>,
}

impl VirtualPage {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            panel: None,
            panels_created: 0,
            tooltip: None,
            tooltips_shown: 0,
            highlighted: None,
            scrolled: Vec::new(),
            clock: None,
        }
    }

    pub fn from_html(html: &str) -> Self {
        Self::new(Document::parse(html))
    }

    /// Pins `now()` to a fixed instant.
    pub fn with_fixed_clock(mut self, at: SystemTime) -> Self {
        self.clock = Some(at);
        self
    }

    /// Moves a pinned clock; `now()` keeps returning `at` until moved again.
    pub fn set_clock(&mut self, at: SystemTime) {
        self.clock = Some(at);
    }

    pub fn panel(&self) -> Option<&Panel> {
        self.panel.as_ref()
    }

    pub fn panels_created(&self) -> usize {
        self.panels_created
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn tooltips_shown(&self) -> usize {
        self.tooltips_shown
    }

    pub fn highlighted(&self) -> Option<NodeHandle> {
        self.highlighted
    }

    pub fn scrolled(&self) -> &[NodeHandle] {
        &self.scrolled
    }

    /// Simulates the page tearing the panel out from under the companion.
    pub fn detach_panel(&mut self) {
        if let Some(panel) = self.panel.as_mut() {
            panel.attached = false;
        }
    }

    /// Simulates the page dropping the tooltip node on its own.
    pub fn drop_tooltip(&mut self) {
        self.tooltip = None;
    }

    /// Translates a pointer event on the widget at `index` into the message
    /// bound to it at render time.
    pub fn pointer(&self, index: usize, event: PointerEvent) -> Option<Msg> {
        let panel = self.panel.as_ref().filter(|panel| panel.attached)?;
        let widget = panel.widgets.iter().find(|widget| widget.index == index)?;
        Some(match event {
            PointerEvent::Click => widget.on_click.clone(),
            PointerEvent::Enter => widget.on_enter.clone(),
            PointerEvent::Leave => widget.on_leave.clone(),
        })
    }
}

impl HostPage for VirtualPage {
    fn document(&self) -> &Document {
        &self.document
    }

    fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    fn create_panel(&mut self) -> bool {
        if self.panel.as_ref().is_some_and(|panel| panel.attached) {
            return false;
        }
        self.panel = Some(Panel::new());
        self.panels_created += 1;
        true
    }

    fn destroy_panel(&mut self) {
        self.panel = None;
    }

    fn show_panel(&mut self) {
        if let Some(panel) = self.panel.as_mut() {
            panel.visible = true;
        }
    }

    fn set_content_visible(&mut self, visible: bool) {
        if let Some(panel) = self.panel.as_mut() {
            panel.content_visible = visible;
        }
    }

    fn render_target(&mut self) -> Option<&mut dyn RenderTarget> {
        self.panel
            .as_mut()
            .map(|panel| panel as &mut dyn RenderTarget)
    }

    fn scroll_into_view(&mut self, node: NodeHandle) {
        self.scrolled.push(node);
    }

    fn set_highlight(&mut self, node: Option<NodeHandle>) {
        self.highlighted = node;
    }

    fn show_tooltip(&mut self, anchor_id: &str, text: &str) {
        self.tooltip = Some(Tooltip {
            anchor_id: anchor_id.to_string(),
            text: text.to_string(),
        });
        self.tooltips_shown += 1;
    }

    fn dismiss_tooltip(&mut self) {
        if self.tooltip.take().is_none() {
            outline_debug!("Tooltip already gone; dismiss ignored");
        }
    }

    fn now(&self) -> SystemTime {
        self.clock.unwrap_or_else(SystemTime::now)
    }
}
