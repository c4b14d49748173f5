use outline_core::{update, AppState, Effect, EntryRow, Msg, TimerKind, TooltipView};
use pretty_assertions::assert_eq;

fn row(index: usize, text: &str) -> EntryRow {
    EntryRow {
        index,
        summary: text.chars().take(15).collect(),
        full_text: text.to_string(),
    }
}

fn with_rows(rows: Vec<EntryRow>) -> AppState {
    let (state, _) = update(AppState::new(), Msg::Activate);
    let (state, _) = update(state, Msg::OutlineRebuilt { rows });
    state
}

#[test]
fn identical_rebuild_only_counts_the_pass() {
    let rows = vec![row(1, "first question"), row(2, "second question")];
    let state = with_rows(rows.clone());

    let (state, effects) = update(state, Msg::OutlineRebuilt { rows: rows.clone() });
    assert!(effects.is_empty());
    assert_eq!(state.view().rows, rows);
    assert_eq!(state.view().passes, 2);
}

#[test]
fn rebuild_while_inactive_is_dropped() {
    let (state, effects) = update(
        AppState::new(),
        Msg::OutlineRebuilt {
            rows: vec![row(1, "late pass")],
        },
    );
    assert!(effects.is_empty());
    assert!(state.view().rows.is_empty());
}

#[test]
fn hover_shows_at_most_one_tooltip() {
    let state = with_rows(vec![row(1, "first question"), row(2, "second question")]);

    let (state, effects) = update(state, Msg::EntryHovered { index: 1 });
    assert_eq!(
        effects,
        vec![Effect::ShowTooltip {
            index: 1,
            text: "first question".to_string(),
        }]
    );

    let (state, effects) = update(state, Msg::EntryHovered { index: 2 });
    assert_eq!(
        effects,
        vec![
            Effect::DismissTooltip,
            Effect::ShowTooltip {
                index: 2,
                text: "second question".to_string(),
            },
        ]
    );
    assert_eq!(
        state.view().tooltip,
        Some(TooltipView {
            index: 2,
            text: "second question".to_string(),
        })
    );

    let (state, effects) = update(state, Msg::EntryLeft);
    assert_eq!(effects, vec![Effect::DismissTooltip]);
    let (_state, effects) = update(state, Msg::EntryLeft);
    assert!(effects.is_empty());
}

#[test]
fn hover_on_unknown_row_is_ignored() {
    let state = with_rows(vec![row(1, "only one")]);
    let (state, effects) = update(state, Msg::EntryHovered { index: 4 });
    assert!(effects.is_empty());
    assert_eq!(state.view().tooltip, None);
}

#[test]
fn tooltip_survives_rebuild_only_while_its_row_is_unchanged() {
    let state = with_rows(vec![row(1, "first question"), row(2, "second question")]);
    let (state, _) = update(state, Msg::EntryHovered { index: 2 });

    let (state, effects) = update(
        state,
        Msg::OutlineRebuilt {
            rows: vec![row(1, "first question"), row(2, "second question")],
        },
    );
    assert!(effects.is_empty());
    assert!(state.view().tooltip.is_some());

    let (state, effects) = update(
        state,
        Msg::OutlineRebuilt {
            rows: vec![row(1, "second question")],
        },
    );
    assert_eq!(effects, vec![Effect::DismissTooltip]);
    assert_eq!(state.view().tooltip, None);
}

#[test]
fn click_reveals_source_and_arms_highlight_clear() {
    let state = with_rows(vec![row(1, "first question")]);
    let (state, effects) = update(state, Msg::EntryClicked { index: 1 });

    assert_eq!(effects[0], Effect::RevealSource { index: 1 });
    assert!(matches!(
        effects[1],
        Effect::ScheduleTimer {
            kind: TimerKind::HighlightClear,
            ..
        }
    ));
    assert_eq!(state.view().selected, Some(1));

    let (state, effects) = update(state, Msg::TimerFired(TimerKind::HighlightClear));
    assert_eq!(effects, vec![Effect::ClearHighlight]);
    assert_eq!(state.view().selected, Some(1));
}

#[test]
fn selection_drops_when_its_row_disappears() {
    let state = with_rows(vec![row(1, "first question"), row(2, "second question")]);
    let (state, _) = update(state, Msg::EntryClicked { index: 2 });
    let (state, _) = update(
        state,
        Msg::OutlineRebuilt {
            rows: vec![row(1, "first question")],
        },
    );
    assert_eq!(state.view().selected, None);
}
