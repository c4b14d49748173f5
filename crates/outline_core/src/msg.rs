use crate::{EntryRow, TimerKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Start a session; re-asserts panel visibility if one is already active.
    Activate,
    /// Global key combination: start when inactive, tear down when active.
    ToggleRequested,
    /// A batch of document mutations arrived from the watcher.
    MutationsObserved { added_nodes: usize },
    /// A previously scheduled timer elapsed.
    TimerFired(TimerKind),
    /// A reconciliation pass produced a fresh outline.
    OutlineRebuilt { rows: Vec<EntryRow> },
    /// User clicked an outline entry (1-based index).
    EntryClicked { index: usize },
    /// Pointer entered an outline entry.
    EntryHovered { index: usize },
    /// Pointer left the hovered outline entry.
    EntryLeft,
    MinimizeClicked,
    MaximizeClicked,
    CloseClicked,
}
