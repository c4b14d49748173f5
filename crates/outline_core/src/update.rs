use crate::{AppState, Effect, Msg, PanelMode, SessionState, TimerKind};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Activate => activate(&mut state),
        Msg::ToggleRequested => match state.session() {
            SessionState::Inactive => activate(&mut state),
            SessionState::Active => deactivate(&mut state),
        },
        Msg::CloseClicked => {
            if state.is_active() {
                deactivate(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::MutationsObserved { added_nodes } => {
            // Removals alone never schedule a pass; the periodic timers pick them up.
            if state.is_active() && added_nodes > 0 {
                vec![state.arm(TimerKind::Debounce)]
            } else {
                Vec::new()
            }
        }
        Msg::TimerFired(kind) => timer_fired(&mut state, kind),
        Msg::OutlineRebuilt { rows } => {
            if !state.is_active() {
                return (state, Vec::new());
            }
            if state.replace_rows(rows) {
                vec![Effect::DismissTooltip]
            } else {
                Vec::new()
            }
        }
        Msg::EntryClicked { index } => {
            let Some(full_text) = active_row_text(&state, index) else {
                return (state, Vec::new());
            };
            state.select(index, full_text);
            vec![
                Effect::RevealSource { index },
                state.arm(TimerKind::HighlightClear),
            ]
        }
        Msg::EntryHovered { index } => {
            let Some(full_text) = active_row_text(&state, index) else {
                return (state, Vec::new());
            };
            let mut effects = Vec::with_capacity(2);
            // At most one tooltip: the previous one goes before the next appears.
            if state.clear_tooltip() {
                effects.push(Effect::DismissTooltip);
            }
            state.set_tooltip(index, full_text.clone());
            effects.push(Effect::ShowTooltip {
                index,
                text: full_text,
            });
            effects
        }
        Msg::EntryLeft => {
            if state.clear_tooltip() {
                vec![Effect::DismissTooltip]
            } else {
                Vec::new()
            }
        }
        Msg::MinimizeClicked => {
            if !state.is_active() || !state.set_panel_mode(PanelMode::Minimized) {
                return (state, Vec::new());
            }
            let mut effects = Vec::with_capacity(2);
            if state.clear_tooltip() {
                effects.push(Effect::DismissTooltip);
            }
            effects.push(Effect::SetContentVisible(false));
            effects
        }
        Msg::MaximizeClicked => {
            if state.is_active() && state.set_panel_mode(PanelMode::Expanded) {
                vec![Effect::SetContentVisible(true)]
            } else {
                Vec::new()
            }
        }
    };

    (state, effects)
}

fn activate(state: &mut AppState) -> Vec<Effect> {
    if state.is_active() {
        return vec![Effect::ShowPanel];
    }
    state.start_session();
    let mut effects = vec![Effect::CreatePanel, Effect::StartWatching];
    for kind in [
        TimerKind::InitialScan,
        TimerKind::Fallback,
        TimerKind::EmptyCheck,
        TimerKind::PanelKeepAlive,
    ] {
        effects.push(state.arm(kind));
    }
    effects
}

fn deactivate(state: &mut AppState) -> Vec<Effect> {
    let mut effects = Vec::new();
    if state.tooltip_visible() {
        effects.push(Effect::DismissTooltip);
    }
    for kind in state.drain_pending() {
        if kind == TimerKind::HighlightClear {
            effects.push(Effect::ClearHighlight);
        }
        effects.push(Effect::CancelTimer { kind });
    }
    effects.push(Effect::StopWatching);
    effects.push(Effect::DestroyPanel);
    state.end_session();
    effects
}

fn timer_fired(state: &mut AppState, kind: TimerKind) -> Vec<Effect> {
    if !state.take_pending(kind) || !state.is_active() {
        return Vec::new();
    }
    match kind {
        TimerKind::InitialScan | TimerKind::Debounce => vec![Effect::Reconcile],
        TimerKind::Fallback => vec![Effect::Reconcile, state.arm(TimerKind::Fallback)],
        TimerKind::EmptyCheck => {
            let mut effects = Vec::with_capacity(2);
            if state.rows().is_empty() {
                effects.push(Effect::Reconcile);
            }
            effects.push(state.arm(TimerKind::EmptyCheck));
            effects
        }
        TimerKind::PanelKeepAlive => {
            vec![Effect::ShowPanel, state.arm(TimerKind::PanelKeepAlive)]
        }
        TimerKind::HighlightClear => vec![Effect::ClearHighlight],
    }
}

fn active_row_text(state: &AppState, index: usize) -> Option<String> {
    if !state.is_active() {
        return None;
    }
    state.row(index).map(|row| row.full_text.clone())
}
