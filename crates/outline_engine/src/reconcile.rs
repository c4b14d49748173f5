use std::time::{Duration, SystemTime};

use outline_core::{EntryRow, Msg};
use outline_logging::{current_pass, outline_debug};

use crate::{Message, NodeHandle};

pub const SUMMARY_WORDS: usize = 5;
pub const SUMMARY_CHARS: usize = 15;
pub const EMPTY_PLACEHOLDER: &str = "No user messages yet. Start the conversation...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub id: String,
    /// 1-based, dense, renumbered every pass.
    pub index: usize,
    pub summary: String,
    pub full_text: String,
    pub source: NodeHandle,
    /// When the source was first picked up; kept across passes.
    pub detected_at: SystemTime,
    /// Age of the entry as of the pass that built it.
    pub time_label: String,
}

/// The outline as of the latest pass. Always rebuilt wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutlineState {
    entries: Vec<DirectoryEntry>,
}

impl OutlineState {
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&DirectoryEntry> {
        index
            .checked_sub(1)
            .and_then(|position| self.entries.get(position))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn rows(&self) -> Vec<EntryRow> {
        self.entries
            .iter()
            .map(|entry| EntryRow {
                index: entry.index,
                summary: entry.summary.clone(),
                full_text: entry.full_text.clone(),
            })
            .collect()
    }
}

/// A rendered outline line with its pointer bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryWidget {
    pub id: String,
    pub index: usize,
    pub summary: String,
    pub full_text: String,
    pub time_label: String,
    pub on_click: Msg,
    pub on_enter: Msg,
    pub on_leave: Msg,
}

/// Where the outline is drawn. The host owns it and may drop it at any time.
pub trait RenderTarget {
    fn is_attached(&self) -> bool;
    fn clear(&mut self);
    fn push_entry(&mut self, widget: EntryWidget);
    fn show_placeholder(&mut self, text: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered { entries: usize },
    Skipped,
}

pub fn entry_id(index: usize) -> String {
    format!("outline-entry-{index}")
}

/// "just now", then whole minutes, then whole hours.
pub fn age_label(detected_at: SystemTime, now: SystemTime) -> String {
    let age = now.duration_since(detected_at).unwrap_or(Duration::ZERO);
    let minutes = age.as_secs() / 60;
    match minutes {
        0 => "just now".to_string(),
        1..=59 => format!("{minutes} min ago"),
        _ => format!("{} h ago", minutes / 60),
    }
}

/// First five words joined by single spaces, cut to fifteen characters.
pub fn summarize(text: &str) -> String {
    let words = text
        .split_whitespace()
        .take(SUMMARY_WORDS)
        .collect::<Vec<_>>()
        .join(" ");
    words.chars().take(SUMMARY_CHARS).collect()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DirectoryReconciler;

impl DirectoryReconciler {
    /// Numbers `messages` into a fresh outline. An entry whose source and
    /// text are unchanged since `previous` keeps its first detection time.
    pub fn rebuild(&self, messages: &[Message], previous: &OutlineState) -> OutlineState {
        let entries = messages
            .iter()
            .enumerate()
            .map(|(position, message)| {
                let index = position + 1;
                let detected_at = previous
                    .entries
                    .iter()
                    .find(|entry| {
                        entry.source == message.source && entry.full_text == message.text
                    })
                    .map_or(message.detected_at, |entry| entry.detected_at);
                DirectoryEntry {
                    id: entry_id(index),
                    index,
                    summary: summarize(&message.text),
                    full_text: message.text.clone(),
                    source: message.source,
                    detected_at,
                    time_label: age_label(detected_at, message.detected_at),
                }
            })
            .collect();
        OutlineState { entries }
    }

    /// Replaces the target's content with one widget per entry. A missing or
    /// detached target is skipped without error.
    pub fn render(
        &self,
        outline: &OutlineState,
        target: Option<&mut dyn RenderTarget>,
    ) -> RenderOutcome {
        let Some(target) = target.filter(|target| target.is_attached()) else {
            outline_debug!("pass={} render target missing; skipped", current_pass());
            return RenderOutcome::Skipped;
        };
        target.clear();
        if outline.is_empty() {
            target.show_placeholder(EMPTY_PLACEHOLDER);
        }
        for entry in outline.entries() {
            target.push_entry(EntryWidget {
                id: entry.id.clone(),
                index: entry.index,
                summary: entry.summary.clone(),
                full_text: entry.full_text.clone(),
                time_label: entry.time_label.clone(),
                on_click: Msg::EntryClicked { index: entry.index },
                on_enter: Msg::EntryHovered { index: entry.index },
                on_leave: Msg::EntryLeft,
            });
        }
        RenderOutcome::Rendered {
            entries: outline.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_takes_five_words_then_fifteen_chars() {
        assert_eq!(summarize("你好"), "你好");
        assert_eq!(summarize("  one   two  "), "one two");
        assert_eq!(summarize("a b c d e f g"), "a b c d e");
        assert_eq!(summarize("alpha beta gamma delta"), "alpha beta gamm");
        assert_eq!(
            summarize("请帮我总结一下这篇关于量子计算的长文章的主要观点"),
            "请帮我总结一下这篇关于量子计算"
        );
    }

    #[test]
    fn age_label_counts_minutes_then_hours() {
        let start = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let after = |secs| start + Duration::from_secs(secs);
        assert_eq!(age_label(start, start), "just now");
        assert_eq!(age_label(start, after(59)), "just now");
        assert_eq!(age_label(start, after(60)), "1 min ago");
        assert_eq!(age_label(start, after(59 * 60 + 59)), "59 min ago");
        assert_eq!(age_label(start, after(2 * 3_600 + 10)), "2 h ago");
        // A clock that went backwards reads as fresh.
        assert_eq!(age_label(after(30), start), "just now");
    }

    #[test]
    fn entry_lookup_is_one_based() {
        let outline = OutlineState::default();
        assert!(outline.entry(0).is_none());
        assert!(outline.entry(1).is_none());
        assert_eq!(entry_id(3), "outline-entry-3");
    }
}
