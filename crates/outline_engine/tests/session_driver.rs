use std::sync::Once;
use std::time::{Duration, SystemTime};

use outline_core::{Msg, PanelMode, SessionState, TimerKind, Timings};
use outline_engine::{
    HostPage, PointerEvent, RenderTarget, SessionDriver, VirtualPage, Vocabulary, WatcherState,
    EMPTY_PLACEHOLDER,
};
use pretty_assertions::assert_eq;

const CHAT: &str = r#"<html><body>
    <header class="site-nav">Docs Blog Pricing</header>
    <div class="chat-container">
        <div class="user-message" id="q1">How should I structure a workspace</div>
        <div class="assistant-message">Split it into crates by concern.</div>
        <div class="user-message" id="q2">What about common test helpers</div>
    </div>
</body></html>"#;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(outline_logging::initialize_for_tests);
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn page(html: &str) -> VirtualPage {
    VirtualPage::from_html(html).with_fixed_clock(SystemTime::UNIX_EPOCH + Duration::from_secs(60))
}

/// Active session with the initial scan already run.
fn scanned(html: &str) -> (SessionDriver, VirtualPage) {
    init_logging();
    let mut page = page(html);
    let mut driver = SessionDriver::default();
    driver.dispatch(&mut page, Msg::Activate);
    driver.advance(&mut page, Timings::default().initial_scan);
    (driver, page)
}

fn summaries(page: &VirtualPage) -> Vec<String> {
    page.panel()
        .map(|panel| panel.widgets().iter().map(|w| w.summary.clone()).collect())
        .unwrap_or_default()
}

#[test]
fn activation_shows_a_placeholder_until_the_initial_scan() {
    init_logging();
    let mut page = page(CHAT);
    let mut driver = SessionDriver::default();
    driver.dispatch(&mut page, Msg::Activate);

    let panel = page.panel().expect("panel created");
    assert_eq!(panel.placeholder(), Some(EMPTY_PLACEHOLDER));
    assert_eq!(driver.passes(), 0);

    driver.advance(&mut page, ms(999));
    assert_eq!(driver.passes(), 0);
    driver.advance(&mut page, ms(1));
    assert_eq!(driver.passes(), 1);
    assert_eq!(summaries(&page), vec!["How should I st", "What about comm"]);
    assert_eq!(page.panel().unwrap().placeholder(), None);
    assert_eq!(driver.view().rows.len(), 2);
}

#[test]
fn activating_twice_keeps_one_panel_and_one_watcher() {
    init_logging();
    let mut page = page(CHAT);
    let mut driver = SessionDriver::default();
    driver.dispatch(&mut page, Msg::Activate);
    driver.dispatch(&mut page, Msg::Activate);

    assert_eq!(page.panels_created(), 1);
    assert_eq!(driver.watcher_state(), WatcherState::Watching);
    assert_eq!(
        driver.pending_timers(),
        vec![
            TimerKind::InitialScan,
            TimerKind::Fallback,
            TimerKind::EmptyCheck,
            TimerKind::PanelKeepAlive,
        ]
    );

    // One watcher means one mutation batch schedules one pass.
    driver.advance(&mut page, ms(1_000));
    page_append(&mut page, r#"<div class="user-message">Another question arrives</div>"#);
    driver.advance(&mut page, Timings::default().debounce);
    assert_eq!(driver.passes(), 2);
}

#[test]
fn toggle_switches_the_session_on_and_off() {
    init_logging();
    let mut page = page(CHAT);
    let mut driver = SessionDriver::default();

    driver.dispatch(&mut page, Msg::ToggleRequested);
    assert_eq!(driver.state().session(), SessionState::Active);
    driver.dispatch(&mut page, Msg::ToggleRequested);
    assert_eq!(driver.state().session(), SessionState::Inactive);
    assert!(page.panel().is_none());
    assert!(driver.pending_timers().is_empty());
}

#[test]
fn a_burst_of_mutations_yields_one_pass_after_the_quiet_period() {
    let (mut driver, mut page) = scanned(CHAT);
    assert_eq!(driver.passes(), 1);

    for text in ["Follow up number one", "Follow up number two", "Follow up number three"] {
        page_append(&mut page, &format!(r#"<div class="user-message">{text}</div>"#));
        driver.advance(&mut page, ms(100));
    }
    assert_eq!(driver.passes(), 1);
    assert!(driver.pending_timers().contains(&TimerKind::Debounce));

    driver.advance(&mut page, ms(199));
    assert_eq!(driver.passes(), 1);
    driver.advance(&mut page, ms(1));
    assert_eq!(driver.passes(), 2);
    assert_eq!(driver.outline().len(), 5);
    assert!(!driver.pending_timers().contains(&TimerKind::Debounce));
}

#[test]
fn removed_sources_vanish_on_the_next_pass_without_errors() {
    let (mut driver, mut page) = scanned(CHAT);
    let q1 = page.document().select_first("#q1").unwrap().unwrap();
    page_remove(&mut page, "#q1");

    // Removal alone schedules nothing; the stale entry is still listed.
    driver.advance(&mut page, ms(1));
    assert!(!driver.pending_timers().contains(&TimerKind::Debounce));
    assert_eq!(driver.outline().len(), 2);

    driver.dispatch(&mut page, Msg::EntryClicked { index: 1 });
    assert!(page.scrolled().is_empty());
    assert_eq!(page.highlighted(), None);

    // The fallback pass (3 s after activation) picks the removal up.
    driver.advance(&mut page, ms(2_000));
    assert_eq!(driver.outline().len(), 1);
    let entry = driver.outline().entry(1).unwrap();
    assert_eq!(entry.full_text, "What about common test helpers");
    assert_ne!(entry.source, q1);
    assert_eq!(summaries(&page), vec!["What about comm"]);
}

#[test]
fn clicking_an_entry_reveals_and_briefly_highlights_its_source() {
    let (mut driver, mut page) = scanned(CHAT);
    let q2 = page.document().select_first("#q2").unwrap().unwrap();

    let click = page.pointer(2, PointerEvent::Click).expect("entry 2 rendered");
    assert_eq!(click, Msg::EntryClicked { index: 2 });
    driver.dispatch(&mut page, click);

    assert_eq!(page.scrolled(), &[q2]);
    assert_eq!(page.highlighted(), Some(q2));
    assert_eq!(driver.view().selected, Some(2));

    driver.advance(&mut page, Timings::default().highlight);
    assert_eq!(page.highlighted(), None);
}

#[test]
fn render_is_skipped_while_the_panel_is_gone_and_keep_alive_restores_it() {
    let (mut driver, mut page) = scanned(CHAT);
    let renders = page.panel().unwrap().render_count();
    page.detach_panel();

    page_append(&mut page, r#"<div class="user-message">Question while hidden</div>"#);
    driver.advance(&mut page, Timings::default().debounce);
    assert_eq!(driver.passes(), 2);
    assert_eq!(driver.outline().len(), 3);
    assert_eq!(page.panel().unwrap().render_count(), renders);
    assert!(page.pointer(1, PointerEvent::Click).is_none());

    // Keep-alive fires 5 s after activation.
    driver.advance(&mut page, ms(5_000));
    let panel = page.panel().unwrap();
    assert!(panel.is_attached());
    assert!(panel.is_visible());
    assert_eq!(page.panels_created(), 2);
    assert_eq!(summaries(&page).len(), 3);
}

#[test]
fn pages_without_a_container_are_observed_in_degraded_mode() {
    let html = r#"<html><body><main>
        <section><div data-role="user">Plain page question here</div></section>
    </main></body></html>"#;
    let (mut driver, mut page) = scanned(html);

    let observation = driver.observation().cloned().unwrap();
    assert!(observation.is_degraded());
    assert_eq!(Some(observation.root()), page.document().body());
    assert_eq!(driver.outline().len(), 1);

    // Anything under <body> now triggers a pass.
    page_append(&mut page, r#"<div data-role="user">Second plain question</div>"#);
    driver.advance(&mut page, Timings::default().debounce);
    assert_eq!(driver.passes(), 2);
    assert_eq!(driver.outline().len(), 2);
}

#[test]
fn empty_check_keeps_rescanning_until_messages_appear() {
    let html = r#"<html><body><div class="chat-container"></div></body></html>"#;
    let (mut driver, mut page) = scanned(html);
    assert_eq!(driver.passes(), 1);
    assert_eq!(page.panel().unwrap().placeholder(), Some(EMPTY_PLACEHOLDER));

    // At 3 s both the fallback and the empty check run a pass.
    driver.advance(&mut page, ms(2_000));
    assert_eq!(driver.passes(), 3);
    assert!(driver.pending_timers().contains(&TimerKind::EmptyCheck));
    assert!(driver.pending_timers().contains(&TimerKind::Fallback));
}

#[test]
fn hovering_keeps_at_most_one_tooltip() {
    let (mut driver, mut page) = scanned(CHAT);

    driver.dispatch(&mut page, Msg::EntryHovered { index: 1 });
    driver.dispatch(&mut page, Msg::EntryHovered { index: 2 });
    let tooltip = page.tooltip().unwrap();
    assert_eq!(tooltip.anchor_id, "outline-entry-2");
    assert_eq!(tooltip.text, "What about common test helpers");
    assert_eq!(page.tooltips_shown(), 2);

    // The page may drop the tooltip itself; leaving must not fail.
    page.drop_tooltip();
    let leave = page.pointer(2, PointerEvent::Leave).unwrap();
    driver.dispatch(&mut page, leave);
    assert!(page.tooltip().is_none());
    assert_eq!(driver.view().tooltip, None);
}

#[test]
fn minimize_hides_content_but_keeps_rows() {
    let (mut driver, mut page) = scanned(CHAT);
    driver.dispatch(&mut page, Msg::EntryHovered { index: 1 });

    driver.dispatch(&mut page, Msg::MinimizeClicked);
    assert!(!page.panel().unwrap().is_content_visible());
    assert!(page.tooltip().is_none());
    assert_eq!(driver.state().panel_mode(), PanelMode::Minimized);
    assert_eq!(driver.view().rows.len(), 2);

    driver.dispatch(&mut page, Msg::MaximizeClicked);
    assert!(page.panel().unwrap().is_content_visible());
    assert_eq!(summaries(&page).len(), 2);
}

#[test]
fn closing_cancels_every_timer_and_a_new_session_starts_clean() {
    let (mut driver, mut page) = scanned(CHAT);
    driver.dispatch(&mut page, Msg::EntryClicked { index: 1 });
    driver.dispatch(&mut page, Msg::EntryHovered { index: 2 });

    driver.dispatch(&mut page, Msg::CloseClicked);
    assert!(driver.pending_timers().is_empty());
    assert_eq!(driver.watcher_state(), WatcherState::Stopped);
    assert!(page.panel().is_none());
    assert!(page.tooltip().is_none());
    assert_eq!(page.highlighted(), None);
    assert!(driver.outline().is_empty());

    let passes = driver.passes();
    page_append(&mut page, r#"<div class="user-message">Nobody is listening now</div>"#);
    driver.advance(&mut page, ms(10_000));
    assert_eq!(driver.passes(), passes);
    assert!(page.panel().is_none());

    driver.dispatch(&mut page, Msg::Activate);
    assert_eq!(driver.watcher_state(), WatcherState::Watching);
    driver.advance(&mut page, Timings::default().initial_scan);
    assert_eq!(driver.outline().len(), 3);
}

#[test]
fn custom_timings_and_vocabulary_are_honoured() {
    init_logging();
    let html = r#"<html><body><div class="chat-container">
        <div class="bubble-mine">Custom marker question</div>
    </div></body></html>"#;
    let mut vocabulary = Vocabulary::default();
    vocabulary.user_classes.push("bubble-mine".to_string());
    let timings = Timings {
        initial_scan: ms(50),
        ..Timings::default()
    };

    let mut page = page(html);
    let mut driver = SessionDriver::new(vocabulary, timings);
    driver.dispatch(&mut page, Msg::Activate);
    driver.advance(&mut page, ms(50));
    assert_eq!(summaries(&page), vec!["Custom marker q"]);
}

#[test]
fn zero_length_periodic_timers_still_let_the_clock_move_on() {
    init_logging();
    let timings = Timings {
        fallback: Duration::ZERO,
        keep_alive: Duration::ZERO,
        empty_check: Duration::ZERO,
        ..Timings::default()
    };
    let mut page = page(CHAT);
    let mut driver = SessionDriver::new(Vocabulary::default(), timings);
    driver.dispatch(&mut page, Msg::Activate);

    driver.advance(&mut page, ms(20));
    assert_eq!(driver.now(), ms(20));
    // One fallback pass per millisecond at most.
    assert!(driver.passes() <= 20, "{} passes", driver.passes());
    assert_eq!(driver.outline().len(), 2);
}

#[test]
fn a_recreated_panel_stays_minimized() {
    let (mut driver, mut page) = scanned(CHAT);
    driver.dispatch(&mut page, Msg::MinimizeClicked);
    page.detach_panel();

    driver.advance(&mut page, ms(5_000));
    assert_eq!(page.panels_created(), 2);
    let panel = page.panel().unwrap();
    assert!(panel.is_visible());
    assert!(!panel.is_content_visible());
    assert_eq!(driver.state().panel_mode(), PanelMode::Minimized);

    driver.dispatch(&mut page, Msg::MaximizeClicked);
    assert!(page.panel().unwrap().is_content_visible());
}

#[test]
fn entries_show_how_long_ago_they_were_first_seen() {
    let (mut driver, mut page) = scanned(CHAT);
    let labels = |page: &VirtualPage| -> Vec<String> {
        page.panel()
            .map(|panel| panel.widgets().iter().map(|w| w.time_label.clone()).collect())
            .unwrap_or_default()
    };
    assert_eq!(labels(&page), vec!["just now", "just now"]);

    page.set_clock(SystemTime::UNIX_EPOCH + Duration::from_secs(60 + 3 * 60));
    page_append(&mut page, r#"<div class="user-message">Another question on naming</div>"#);
    driver.advance(&mut page, Timings::default().debounce);

    assert_eq!(labels(&page), vec!["3 min ago", "3 min ago", "just now"]);
    let first = driver.outline().entry(1).unwrap();
    assert_eq!(first.detected_at, SystemTime::UNIX_EPOCH + Duration::from_secs(60));
}

fn page_append(page: &mut VirtualPage, html: &str) {
    page.document_mut()
        .append_html_to(".chat-container", html)
        .or_else(|_| page.document_mut().append_html_to("main", html))
        .expect("append target exists");
}

fn page_remove(page: &mut VirtualPage, selector: &str) {
    let removed = page.document_mut().remove_matching(selector).unwrap();
    assert_eq!(removed, 1);
}
