use std::time::Duration;

use crate::TimerKind;

/// Side effects requested by `update`; executed by the session driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CreatePanel,
    /// Re-assert panel visibility without recreating it.
    ShowPanel,
    DestroyPanel,
    /// Show or hide the entry list and the resize affordance.
    SetContentVisible(bool),
    StartWatching,
    StopWatching,
    /// Arm a one-shot timer. Arming a pending kind moves its deadline.
    ScheduleTimer { kind: TimerKind, delay: Duration },
    CancelTimer { kind: TimerKind },
    /// Run one collect -> dedupe -> rebuild -> render pass.
    Reconcile,
    /// Scroll the source element of entry `index` into view and highlight it.
    RevealSource { index: usize },
    ClearHighlight,
    ShowTooltip { index: usize, text: String },
    DismissTooltip,
}
