//! Outline engine: document model, message detection pipeline and effect execution.
mod classify;
mod collect;
mod dedup;
mod dom;
mod extract;
mod host;
mod page;
mod reconcile;
mod session;
mod style;
mod timer;
mod vocabulary;
mod watch;

pub use classify::{Classification, Classifier, Predicate, Rule, Subject};
pub use collect::{Message, MessageCollector, PANEL_ELEMENT_ID};
pub use dedup::{dedupe, dedupe_by_key};
pub use dom::{Document, DomError, MutationRecord, MutationSource, NodeHandle, ObserverId};
pub use extract::{meets_extraction_floor, TextExtractor, EXTRACTION_FLOOR};
pub use host::HostPage;
pub use page::{Panel, PointerEvent, Tooltip, VirtualPage};
pub use reconcile::{
    age_label, entry_id, summarize, DirectoryEntry, DirectoryReconciler, EntryWidget, OutlineState,
    RenderOutcome, RenderTarget, EMPTY_PLACEHOLDER, SUMMARY_CHARS, SUMMARY_WORDS,
};
pub use session::SessionDriver;
pub use style::{LayoutHints, StyleSheet};
pub use timer::{TimerQueue, MIN_TIMER_DELAY};
pub use vocabulary::Vocabulary;
pub use watch::{ChangeWatcher, MutationSummary, Observation, WatcherState};
