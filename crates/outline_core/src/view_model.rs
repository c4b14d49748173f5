use crate::{PanelMode, SessionState, TimerKind};

/// One outline line as the panel shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow {
    /// 1-based position; renumbered every pass.
    pub index: usize,
    pub summary: String,
    pub full_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipView {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    pub panel_mode: PanelMode,
    pub rows: Vec<EntryRow>,
    pub tooltip: Option<TooltipView>,
    pub selected: Option<usize>,
    pub pending_timers: Vec<TimerKind>,
    pub passes: u64,
}
