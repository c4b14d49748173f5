use std::time::SystemTime;

use outline_logging::{current_pass, outline_debug, outline_trace};
use scraper::ElementRef;

use crate::classify::{Classification, Classifier, Subject};
use crate::dom::{child_elements, handle_of};
use crate::extract::TextExtractor;
use crate::style::StyleSheet;
use crate::{Document, NodeHandle, Vocabulary};

/// `id` of the companion's own panel when a host renders it into the page.
pub const PANEL_ELEMENT_ID: &str = "outline-companion-panel";

const OPAQUE_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub source: NodeHandle,
    pub text: String,
    pub detected_at: SystemTime,
}

/// Walks the whole document and returns candidate user messages in document
/// order. Nothing is cached between calls.
pub struct MessageCollector {
    extractor: TextExtractor,
    classifier: Classifier,
}

impl MessageCollector {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self {
            extractor: TextExtractor::new(&vocabulary),
            classifier: Classifier::new(vocabulary),
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn classifier_mut(&mut self) -> &mut Classifier {
        &mut self.classifier
    }

    pub fn extractor(&self) -> &TextExtractor {
        &self.extractor
    }

    pub fn collect(&self, document: &Document, detected_at: SystemTime) -> Vec<Message> {
        let Some(root) = document.element(document.content_root()) else {
            return Vec::new();
        };
        let stylesheet = StyleSheet::from_document(document);
        let mut messages = Vec::new();
        let mut visited = 0usize;

        // Depth-first in document order. A captured element's subtree is never
        // entered, so nested spans of one bubble cannot be counted twice.
        let mut stack: Vec<ElementRef<'_>> = child_elements(root).collect();
        stack.reverse();
        while let Some(element) = stack.pop() {
            if is_opaque(element) {
                continue;
            }
            visited += 1;
            if let Some(text) = self.capture(element, &stylesheet) {
                messages.push(Message {
                    source: handle_of(element),
                    text,
                    detected_at,
                });
                continue;
            }
            let mark = stack.len();
            stack.extend(child_elements(element));
            stack[mark..].reverse();
        }

        outline_debug!(
            "pass={} visited={} user_messages={}",
            current_pass(),
            visited,
            messages.len()
        );
        messages
    }

    fn capture(&self, element: ElementRef<'_>, stylesheet: &StyleSheet) -> Option<String> {
        let text = self.extractor.extract(element);
        let verdict = {
            let subject = Subject::new(element, &text, stylesheet.resolve(element));
            self.classifier.explain(&subject)
        };
        match verdict {
            (Classification::UserMessage, rule) => {
                outline_trace!(
                    "pass={} captured via {:?}: {:.50}",
                    current_pass(),
                    rule,
                    text
                );
                Some(text)
            }
            _ => None,
        }
    }
}

impl Default for MessageCollector {
    fn default() -> Self {
        Self::new(Vocabulary::default())
    }
}

fn is_opaque(element: ElementRef<'_>) -> bool {
    OPAQUE_TAGS.contains(&element.value().name())
        || element.value().id() == Some(PANEL_ELEMENT_ID)
}
