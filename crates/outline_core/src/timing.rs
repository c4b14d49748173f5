use std::time::Duration;

/// The one-shot timers a session can have pending. Periodic behaviour is
/// expressed by re-arming on every firing, so each kind can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerKind {
    /// First pass after activation, giving the page time to settle.
    InitialScan,
    /// Coalesces a burst of mutation batches into one pass.
    Debounce,
    /// Periodic pass independent of mutation notifications.
    Fallback,
    /// Periodic check that forces a pass while the outline is empty.
    EmptyCheck,
    /// Periodic re-assertion of panel visibility.
    PanelKeepAlive,
    /// Removes the transient highlight from a revealed message.
    HighlightClear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub initial_scan: Duration,
    pub debounce: Duration,
    pub fallback: Duration,
    pub empty_check: Duration,
    pub keep_alive: Duration,
    pub highlight: Duration,
}

impl Timings {
    pub fn delay_for(&self, kind: TimerKind) -> Duration {
        match kind {
            TimerKind::InitialScan => self.initial_scan,
            TimerKind::Debounce => self.debounce,
            TimerKind::Fallback => self.fallback,
            TimerKind::EmptyCheck => self.empty_check,
            TimerKind::PanelKeepAlive => self.keep_alive,
            TimerKind::HighlightClear => self.highlight,
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            initial_scan: Duration::from_millis(1_000),
            debounce: Duration::from_millis(300),
            fallback: Duration::from_millis(3_000),
            empty_check: Duration::from_millis(3_000),
            keep_alive: Duration::from_millis(5_000),
            highlight: Duration::from_millis(3_000),
        }
    }
}
