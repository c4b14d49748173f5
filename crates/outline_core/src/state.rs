use std::collections::BTreeSet;

use crate::view_model::{AppViewModel, EntryRow, TooltipView};
use crate::{Effect, TimerKind, Timings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Inactive,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelMode {
    #[default]
    Expanded,
    Minimized,
}

/// A row reference that survives a rebuild only if the row still shows the
/// same text at the same position.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RowAnchor {
    index: usize,
    full_text: String,
}

impl RowAnchor {
    fn still_matches(&self, rows: &[EntryRow]) -> bool {
        find_row(rows, self.index).is_some_and(|row| row.full_text == self.full_text)
    }
}

/// The explicit session object. Everything the companion remembers between
/// callbacks lives here; the engine owns nothing but handles.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    session: SessionState,
    panel_mode: PanelMode,
    rows: Vec<EntryRow>,
    tooltip: Option<RowAnchor>,
    selected: Option<RowAnchor>,
    pending_timers: BTreeSet<TimerKind>,
    timings: Timings,
    passes: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timings(timings: Timings) -> Self {
        Self {
            timings,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            session: self.session,
            panel_mode: self.panel_mode,
            rows: self.rows.clone(),
            tooltip: self.tooltip.as_ref().map(|anchor| TooltipView {
                index: anchor.index,
                text: anchor.full_text.clone(),
            }),
            selected: self.selected.as_ref().map(|anchor| anchor.index),
            pending_timers: self.pending_timers.iter().copied().collect(),
            passes: self.passes,
        }
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn panel_mode(&self) -> PanelMode {
        self.panel_mode
    }

    pub fn rows(&self) -> &[EntryRow] {
        &self.rows
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    pub fn is_timer_pending(&self, kind: TimerKind) -> bool {
        self.pending_timers.contains(&kind)
    }

    pub(crate) fn is_active(&self) -> bool {
        self.session == SessionState::Active
    }

    pub(crate) fn start_session(&mut self) {
        self.session = SessionState::Active;
        self.panel_mode = PanelMode::Expanded;
    }

    /// Drops every piece of session state; timings and the pass count survive.
    pub(crate) fn end_session(&mut self) {
        self.session = SessionState::Inactive;
        self.panel_mode = PanelMode::Expanded;
        self.rows.clear();
        self.tooltip = None;
        self.selected = None;
        self.pending_timers.clear();
    }

    pub(crate) fn set_panel_mode(&mut self, mode: PanelMode) -> bool {
        if self.panel_mode == mode {
            return false;
        }
        self.panel_mode = mode;
        true
    }

    /// Marks `kind` pending and returns the effect that arms it.
    pub(crate) fn arm(&mut self, kind: TimerKind) -> Effect {
        self.pending_timers.insert(kind);
        Effect::ScheduleTimer {
            kind,
            delay: self.timings.delay_for(kind),
        }
    }

    /// Clears the pending mark of a fired timer. Returns false for timers
    /// that were cancelled or never armed.
    pub(crate) fn take_pending(&mut self, kind: TimerKind) -> bool {
        self.pending_timers.remove(&kind)
    }

    pub(crate) fn drain_pending(&mut self) -> Vec<TimerKind> {
        std::mem::take(&mut self.pending_timers).into_iter().collect()
    }

    /// Replaces the outline rows. Returns true when a visible tooltip lost
    /// its row and must be dismissed.
    pub(crate) fn replace_rows(&mut self, rows: Vec<EntryRow>) -> bool {
        self.passes += 1;
        self.rows = rows;
        if self
            .selected
            .as_ref()
            .is_some_and(|anchor| !anchor.still_matches(&self.rows))
        {
            self.selected = None;
        }
        match &self.tooltip {
            Some(anchor) if !anchor.still_matches(&self.rows) => {
                self.tooltip = None;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn row(&self, index: usize) -> Option<&EntryRow> {
        find_row(&self.rows, index)
    }

    pub(crate) fn select(&mut self, index: usize, full_text: String) {
        self.selected = Some(RowAnchor { index, full_text });
    }

    pub(crate) fn tooltip_visible(&self) -> bool {
        self.tooltip.is_some()
    }

    pub(crate) fn set_tooltip(&mut self, index: usize, full_text: String) {
        self.tooltip = Some(RowAnchor { index, full_text });
    }

    pub(crate) fn clear_tooltip(&mut self) -> bool {
        self.tooltip.take().is_some()
    }
}

fn find_row(rows: &[EntryRow], index: usize) -> Option<&EntryRow> {
    rows.iter().find(|row| row.index == index)
}
