//! Outline core: pure session state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod timing;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{AppState, PanelMode, SessionState};
pub use timing::{TimerKind, Timings};
pub use update::update;
pub use view_model::{AppViewModel, EntryRow, TooltipView};
