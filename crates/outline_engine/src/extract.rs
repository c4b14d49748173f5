use ego_tree::NodeRef;
use outline_logging::outline_warn;
use scraper::node::Node;
use scraper::{ElementRef, Selector};
use unicode_width::UnicodeWidthStr;

use crate::Vocabulary;

/// Text at or below this display width is never promoted to a message.
/// CJK characters count two columns, so "你好" passes while "ok" does not.
pub const EXTRACTION_FLOOR: usize = 2;

/// Elements whose text is never message content.
const NON_CONTENT_TAGS: &[&str] = &["script", "style", "noscript", "template"];

pub fn meets_extraction_floor(text: &str) -> bool {
    UnicodeWidthStr::width(text) > EXTRACTION_FLOOR
}

/// Produces the "clean" text of an element: chrome descendants are left out,
/// action labels are stripped, whitespace is collapsed.
///
/// The element is only read; nothing in the document changes.
pub struct TextExtractor {
    chrome: Vec<Selector>,
    cjk_labels: Vec<String>,
    standalone_labels: Vec<String>,
}

impl TextExtractor {
    pub fn new(vocabulary: &Vocabulary) -> Self {
        let chrome = vocabulary
            .chrome_selectors
            .iter()
            .filter_map(|raw| match Selector::parse(raw) {
                Ok(selector) => Some(selector),
                Err(_) => {
                    outline_warn!("Ignoring unparseable chrome selector {:?}", raw);
                    None
                }
            })
            .collect();
        Self {
            chrome,
            cjk_labels: vocabulary.cjk_action_labels.clone(),
            standalone_labels: vocabulary
                .standalone_action_labels
                .iter()
                .map(|label| label.to_lowercase())
                .collect(),
        }
    }

    pub fn extract(&self, element: ElementRef<'_>) -> String {
        let mut raw = String::new();
        self.collect_text(*element, &mut raw);
        for label in &self.cjk_labels {
            if raw.contains(label.as_str()) {
                raw = raw.replace(label.as_str(), "");
            }
        }
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// True for elements whose whole subtree is dropped during extraction.
    pub fn is_chrome(&self, element: ElementRef<'_>) -> bool {
        NON_CONTENT_TAGS.contains(&element.value().name())
            || self.chrome.iter().any(|selector| selector.matches(&element))
    }

    fn collect_text(&self, node: NodeRef<'_, Node>, out: &mut String) {
        for child in node.children() {
            match child.value() {
                Node::Text(text) => {
                    if !self.is_standalone_label(text) {
                        out.push_str(text);
                    }
                }
                Node::Element(_) => {
                    if let Some(element) = ElementRef::wrap(child) {
                        if !self.is_chrome(element) {
                            self.collect_text(child, out);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn is_standalone_label(&self, text: &str) -> bool {
        let trimmed = text.trim();
        !trimmed.is_empty()
            && self
                .standalone_labels
                .iter()
                .any(|label| trimmed.eq_ignore_ascii_case(label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;

    fn extract(html: &str) -> String {
        let doc = Document::parse(html);
        let handle = doc.select_first("#m").unwrap().unwrap();
        TextExtractor::new(&Vocabulary::default()).extract(doc.element(handle).unwrap())
    }

    #[test]
    fn chrome_descendants_are_dropped() {
        let text = extract(
            r#"<div id="m">  How do I   bake
                bread?<button>Copy</button><a href="/x">link text</a>
                <span class="toolbar"><span>tools</span></span><svg><text>icon</text></svg></div>"#,
        );
        assert_eq!(text, "How do I bake bread?");
    }

    #[test]
    fn cjk_action_labels_are_stripped_anywhere() {
        assert_eq!(extract(r#"<div id="m">帮我写一首诗 复制 分享</div>"#), "帮我写一首诗");
    }

    #[test]
    fn english_labels_only_go_when_standing_alone() {
        let text = extract(r#"<div id="m"><p>I like this plan</p><span> Reply </span></div>"#);
        assert_eq!(text, "I like this plan");
    }

    #[test]
    fn extraction_leaves_the_document_untouched() {
        let doc = Document::parse(r#"<div id="m">text<button>Copy</button></div>"#);
        let handle = doc.select_first("#m").unwrap().unwrap();
        let before = doc.element(handle).unwrap().html();
        let _ = TextExtractor::new(&Vocabulary::default()).extract(doc.element(handle).unwrap());
        assert_eq!(doc.element(handle).unwrap().html(), before);
    }

    #[test]
    fn floor_uses_display_width() {
        assert!(!meets_extraction_floor(""));
        assert!(!meets_extraction_floor("ok"));
        assert!(!meets_extraction_floor("好"));
        assert!(meets_extraction_floor("abc"));
        assert!(meets_extraction_floor("你好"));
    }
}
