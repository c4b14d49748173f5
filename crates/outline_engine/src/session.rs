use std::collections::VecDeque;
use std::time::Duration;

use outline_core::{update, AppState, AppViewModel, Effect, Msg, PanelMode, TimerKind, Timings};
use outline_logging::{outline_debug, outline_info, outline_trace, set_pass};

use crate::dedup::dedupe;
use crate::reconcile::{entry_id, DirectoryReconciler, OutlineState, RenderOutcome};
use crate::timer::TimerQueue;
use crate::watch::{ChangeWatcher, Observation, WatcherState};
use crate::{HostPage, MessageCollector, Vocabulary};

/// Runs the core state machine against a host page: feeds it messages,
/// executes the effects it returns and drives its timers on a virtual clock.
pub struct SessionDriver {
    state: AppState,
    watcher: ChangeWatcher,
    container_selectors: Vec<String>,
    timers: TimerQueue,
    collector: MessageCollector,
    reconciler: DirectoryReconciler,
    outline: OutlineState,
    now: Duration,
    passes: u64,
}

impl SessionDriver {
    pub fn new(vocabulary: Vocabulary, timings: Timings) -> Self {
        let container_selectors = vocabulary.container_selectors.clone();
        Self {
            state: AppState::with_timings(timings),
            watcher: ChangeWatcher::new(container_selectors.clone()),
            container_selectors,
            timers: TimerQueue::new(),
            collector: MessageCollector::new(vocabulary),
            reconciler: DirectoryReconciler,
            outline: OutlineState::default(),
            now: Duration::ZERO,
            passes: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn outline(&self) -> &OutlineState {
        &self.outline
    }

    pub fn observation(&self) -> Option<&Observation> {
        self.watcher.observation()
    }

    pub fn watcher_state(&self) -> WatcherState {
        self.watcher.state()
    }

    pub fn pending_timers(&self) -> Vec<TimerKind> {
        self.timers.pending()
    }

    pub fn collector_mut(&mut self) -> &mut MessageCollector {
        &mut self.collector
    }

    /// Time elapsed on the virtual clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Reconciliation passes run so far, across sessions.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Applies `msg` and every follow-up message it produces.
    pub fn dispatch<H: HostPage + ?Sized>(&mut self, host: &mut H, msg: Msg) {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            outline_trace!("dispatch {:?}", msg);
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            for effect in effects {
                if let Some(follow_up) = self.run_effect(host, effect) {
                    inbox.push_back(follow_up);
                }
            }
        }
    }

    /// Drains the mutation feed into the state machine.
    pub fn pump_mutations<H: HostPage + ?Sized>(&mut self, host: &mut H) {
        let summary = self.watcher.poll(host.document_mut());
        if summary.added_nodes > 0 {
            self.dispatch(
                host,
                Msg::MutationsObserved {
                    added_nodes: summary.added_nodes,
                },
            );
        }
    }

    /// Moves the virtual clock forward by `by`, firing every timer that comes
    /// due on the way in deadline order.
    pub fn advance<H: HostPage + ?Sized>(&mut self, host: &mut H, by: Duration) {
        let until = self.now + by;
        loop {
            self.pump_mutations(host);
            let Some((_, at)) = self.timers.next_deadline() else {
                break;
            };
            if at > until {
                break;
            }
            self.now = self.now.max(at);
            if let Some(kind) = self.timers.pop_due(self.now) {
                outline_trace!("timer {:?} fired at {:?}", kind, self.now);
                self.dispatch(host, Msg::TimerFired(kind));
            }
        }
        self.now = until;
    }

    fn run_effect<H: HostPage + ?Sized>(&mut self, host: &mut H, effect: Effect) -> Option<Msg> {
        match effect {
            Effect::CreatePanel => {
                if host.create_panel() {
                    outline_info!("Outline panel created");
                }
                self.reconciler.render(&self.outline, host.render_target());
            }
            Effect::ShowPanel => {
                let attached = host
                    .render_target()
                    .is_some_and(|target| target.is_attached());
                if !attached {
                    outline_info!("Outline panel missing from the page; recreating");
                    host.create_panel();
                    // New panels start expanded; carry a minimized state over.
                    host.set_content_visible(self.state.panel_mode() == PanelMode::Expanded);
                    self.reconciler.render(&self.outline, host.render_target());
                }
                host.show_panel();
            }
            Effect::DestroyPanel => {
                host.destroy_panel();
                self.outline = OutlineState::default();
                outline_info!("Outline panel destroyed");
            }
            Effect::SetContentVisible(visible) => host.set_content_visible(visible),
            Effect::StartWatching => {
                if self.watcher.state() == WatcherState::Stopped {
                    self.watcher = ChangeWatcher::new(self.container_selectors.clone());
                }
                self.watcher.start(host.document_mut());
            }
            Effect::StopWatching => self.watcher.stop(host.document_mut()),
            Effect::ScheduleTimer { kind, delay } => self.timers.schedule(kind, self.now, delay),
            Effect::CancelTimer { kind } => {
                self.timers.cancel(kind);
            }
            Effect::Reconcile => return Some(self.reconcile(host)),
            Effect::RevealSource { index } => self.reveal(host, index),
            Effect::ClearHighlight => host.set_highlight(None),
            Effect::ShowTooltip { index, text } => host.show_tooltip(&entry_id(index), &text),
            Effect::DismissTooltip => host.dismiss_tooltip(),
        }
        None
    }

    fn reconcile<H: HostPage + ?Sized>(&mut self, host: &mut H) -> Msg {
        self.passes += 1;
        set_pass(self.passes);

        let messages = dedupe(self.collector.collect(host.document(), host.now()));
        self.outline = self.reconciler.rebuild(&messages, &self.outline);
        match self.reconciler.render(&self.outline, host.render_target()) {
            RenderOutcome::Rendered { entries } => {
                outline_debug!("pass={} rendered {} entries", self.passes, entries);
            }
            RenderOutcome::Skipped => {}
        }
        Msg::OutlineRebuilt {
            rows: self.outline.rows(),
        }
    }

    fn reveal<H: HostPage + ?Sized>(&mut self, host: &mut H, index: usize) {
        let Some(source) = self.outline.entry(index).map(|entry| entry.source) else {
            outline_debug!("Reveal of unknown entry {} ignored", index);
            return;
        };
        if !host.document().is_attached(source) {
            outline_debug!("Source of entry {} left the page; reveal skipped", index);
            return;
        }
        host.set_highlight(None);
        host.scroll_into_view(source);
        host.set_highlight(Some(source));
    }
}

impl Default for SessionDriver {
    fn default() -> Self {
        Self::new(Vocabulary::default(), Timings::default())
    }
}
