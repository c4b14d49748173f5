use std::collections::BTreeMap;
use std::time::Duration;

use outline_core::TimerKind;

/// Shortest delay a timer can be armed with. A timer re-armed from its own
/// callback therefore always lands strictly after the instant it fired.
pub const MIN_TIMER_DELAY: Duration = Duration::from_millis(1);

/// One-shot timers on a virtual clock, at most one per kind.
///
/// Scheduling a kind that is already pending moves its deadline instead of
/// adding a second timer; a burst of events that each schedule `Debounce`
/// therefore fires exactly once, `delay` after the last event.
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    deadlines: BTreeMap<TimerKind, Duration>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, kind: TimerKind, now: Duration, delay: Duration) {
        self.deadlines.insert(kind, now + delay.max(MIN_TIMER_DELAY));
    }

    /// Returns false if nothing was pending for `kind`.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        self.deadlines.remove(&kind).is_some()
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.deadlines.contains_key(&kind)
    }

    pub fn deadline(&self, kind: TimerKind) -> Option<Duration> {
        self.deadlines.get(&kind).copied()
    }

    pub fn pending(&self) -> Vec<TimerKind> {
        self.deadlines.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }

    /// Earliest deadline; ties go to the kind declared first.
    pub fn next_deadline(&self) -> Option<(TimerKind, Duration)> {
        self.deadlines
            .iter()
            .min_by_key(|(kind, at)| (**at, **kind))
            .map(|(kind, at)| (*kind, *at))
    }

    /// Removes and returns the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<TimerKind> {
        let (kind, at) = self.next_deadline()?;
        if at > now {
            return None;
        }
        self.deadlines.remove(&kind);
        Some(kind)
    }
}
