use outline_logging::{outline_debug, outline_info, outline_warn};

use crate::dom::{MutationSource, ObserverId};
use crate::NodeHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatcherState {
    #[default]
    Idle,
    Watching,
    Stopped,
}

/// Which root the watcher ended up observing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    Container { selector: String, root: NodeHandle },
    /// No container matched; the whole body is observed, so unrelated page
    /// mutations also trigger passes.
    Degraded { root: NodeHandle },
}

impl Observation {
    pub fn root(&self) -> NodeHandle {
        match self {
            Observation::Container { root, .. } | Observation::Degraded { root } => *root,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Observation::Degraded { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MutationSummary {
    /// Batches that added at least one node.
    pub batches: usize,
    pub added_nodes: usize,
}

pub struct ChangeWatcher {
    state: WatcherState,
    selectors: Vec<String>,
    observer: Option<ObserverId>,
    observation: Option<Observation>,
}

impl ChangeWatcher {
    pub fn new(selectors: Vec<String>) -> Self {
        Self {
            state: WatcherState::Idle,
            selectors,
            observer: None,
            observation: None,
        }
    }

    pub fn state(&self) -> WatcherState {
        self.state
    }

    pub fn observation(&self) -> Option<&Observation> {
        self.observation.as_ref()
    }

    /// Subscribes to the first matching container, or the fallback root.
    /// Returns `None` once stopped: a stopped watcher is never restarted.
    pub fn start<S: MutationSource + ?Sized>(&mut self, source: &mut S) -> Option<&Observation> {
        match self.state {
            WatcherState::Watching => return self.observation.as_ref(),
            WatcherState::Stopped => {
                outline_warn!("Refusing to restart a stopped change watcher");
                return None;
            }
            WatcherState::Idle => {}
        }

        let observation = self
            .selectors
            .iter()
            .find_map(|selector| {
                source
                    .find_container(selector)
                    .map(|root| Observation::Container {
                        selector: selector.clone(),
                        root,
                    })
            })
            .unwrap_or_else(|| Observation::Degraded {
                root: source.fallback_root(),
            });

        match &observation {
            Observation::Container { selector, .. } => {
                outline_info!("Observing transcript container {}", selector);
            }
            Observation::Degraded { .. } => {
                outline_warn!(
                    "No transcript container matched; observing the whole body (degraded)"
                );
            }
        }

        self.observer = Some(source.observe(observation.root()));
        self.observation = Some(observation);
        self.state = WatcherState::Watching;
        self.observation.as_ref()
    }

    /// Drains pending mutation records. Removal-only batches are dropped.
    pub fn poll<S: MutationSource + ?Sized>(&mut self, source: &mut S) -> MutationSummary {
        let Some(observer) = self.observer.filter(|_| self.state == WatcherState::Watching) else {
            return MutationSummary::default();
        };
        let mut summary = MutationSummary::default();
        for record in source.take_records(observer) {
            if record.added_nodes > 0 {
                summary.batches += 1;
                summary.added_nodes += record.added_nodes;
            }
        }
        if summary.batches > 0 {
            outline_debug!(
                "Mutation feed: {} batches, {} added nodes",
                summary.batches,
                summary.added_nodes
            );
        }
        summary
    }

    pub fn stop<S: MutationSource + ?Sized>(&mut self, source: &mut S) {
        if let Some(observer) = self.observer.take() {
            source.disconnect(observer);
        }
        if self.state != WatcherState::Stopped {
            outline_info!("Change watcher stopped");
        }
        self.state = WatcherState::Stopped;
    }
}
