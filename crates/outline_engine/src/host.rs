use std::time::SystemTime;

use crate::reconcile::RenderTarget;
use crate::{Document, NodeHandle};

/// The page the companion lives in. Every call is best effort: a host that
/// lost its panel or tooltip treats the request as a no-op.
pub trait HostPage {
    fn document(&self) -> &Document;
    fn document_mut(&mut self) -> &mut Document;

    /// Creates the panel; returns false if one already exists.
    fn create_panel(&mut self) -> bool;
    fn destroy_panel(&mut self);
    fn show_panel(&mut self);
    /// Shows or hides the entry list and resize handle; outline state is kept.
    fn set_content_visible(&mut self, visible: bool);
    fn render_target(&mut self) -> Option<&mut dyn RenderTarget>;

    fn scroll_into_view(&mut self, node: NodeHandle);
    /// Highlights `node`, replacing any previous highlight; `None` clears it.
    fn set_highlight(&mut self, node: Option<NodeHandle>);

    fn show_tooltip(&mut self, anchor_id: &str, text: &str);
    fn dismiss_tooltip(&mut self);

    /// Wall-clock time used to stamp detected messages.
    fn now(&self) -> SystemTime;
}
