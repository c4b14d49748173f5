//! Heuristic node classification driven by ordered rule tables.
//!
//! Three tables are evaluated in a fixed order: file-upload records, then UI
//! chrome, then user messages. The first two exclude a node even when a user
//! marker is present; the last only runs on text above the extraction floor.

use once_cell::sync::Lazy;
use outline_logging::outline_warn;
use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::dom::{descendant_elements, has_any_class};
use crate::extract::meets_extraction_floor;
use crate::style::LayoutHints;
use crate::Vocabulary;

static SIZE_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| {
    match Regex::new(r"(?i)\d+(?:\.\d+)?\s*(?:KB|MB|GB|TB)") {
        Ok(regex) => Some(regex),
        Err(err) => {
            outline_warn!("File size pattern rejected: {}", err);
            None
        }
    }
});

fn mentions_file_size(text: &str) -> bool {
    SIZE_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(text))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    UserMessage,
    FileUploadRecord,
    UiChrome,
    Unclassified,
}

/// Everything a rule may look at for one node.
pub struct Subject<'a> {
    pub element: ElementRef<'a>,
    pub text: &'a str,
    pub layout: LayoutHints,
    lowered: String,
}

impl<'a> Subject<'a> {
    pub fn new(element: ElementRef<'a>, text: &'a str, layout: LayoutHints) -> Self {
        Self {
            element,
            text,
            layout,
            lowered: text.to_lowercase(),
        }
    }

    fn tag(&self) -> &str {
        self.element.value().name()
    }

    fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }
}

pub type Predicate = fn(&Classifier, &Subject<'_>) -> bool;

#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub test: Predicate,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Rule").field(&self.name).finish()
    }
}

const FILE_RULES: &[Rule] = &[
    Rule {
        name: "extension-with-size",
        test: |c, s| c.has_file_extension(s.text) && mentions_file_size(s.text),
    },
    Rule {
        name: "extension-with-upload-keyword",
        test: |c, s| c.has_file_extension(s.text) && contains_any(&s.lowered, &c.upload_keywords),
    },
    Rule {
        name: "bare-filename",
        test: |c, s| c.has_file_extension(s.text) && s.text.split_whitespace().count() <= 3,
    },
    Rule {
        name: "file-marker",
        test: |c, s| {
            has_any_class(s.element, &c.vocabulary.file_classes)
                || matches_descendant(s.element, &c.file_descendants)
        },
    },
];

const CHROME_RULES: &[Rule] = &[
    Rule {
        name: "action-keyword",
        test: |c, s| contains_any(&s.lowered, &c.ui_keywords),
    },
    Rule {
        name: "button",
        test: |c, s| {
            s.tag() == "button"
                || has_any_class(s.element, &c.vocabulary.button_classes)
                || s.attr("role") == Some("button")
        },
    },
    Rule {
        name: "link",
        test: |c, s| s.tag() == "a" || has_any_class(s.element, &c.vocabulary.link_classes),
    },
    Rule {
        name: "badge",
        test: |c, s| has_any_class(s.element, &c.vocabulary.badge_classes),
    },
    Rule {
        name: "icon",
        test: |c, s| {
            has_any_class(s.element, &c.vocabulary.icon_classes)
                || descendant_elements(s.element).any(|el| el.value().name() == "svg")
        },
    },
    Rule {
        name: "toolbar",
        test: |c, s| has_any_class(s.element, &c.vocabulary.toolbar_classes),
    },
];

const USER_RULES: &[Rule] = &[
    Rule {
        name: "user-class",
        test: |c, s| has_any_class(s.element, &c.vocabulary.user_classes),
    },
    Rule {
        name: "user-attribute",
        test: |c, s| has_user_attribute(c, s.element),
    },
    Rule {
        name: "user-parent",
        test: |c, s| {
            s.element
                .parent()
                .and_then(ElementRef::wrap)
                .is_some_and(|parent| {
                    has_any_class(parent, &c.vocabulary.user_parent_classes)
                        || parent.value().attr("data-role") == Some("user")
                })
        },
    },
    Rule {
        // A container holding several marked bubbles is a transcript, not a message.
        name: "user-descendant",
        test: |c, s| {
            descendant_elements(s.element)
                .filter(|el| c.user_descendants.iter().any(|sel| sel.matches(el)))
                .take(2)
                .count()
                == 1
        },
    },
    Rule {
        name: "speaker-prefix",
        test: |c, s| {
            let prefixes = &c.vocabulary.speaker_prefixes;
            let leads = prefixes.iter().any(|p| s.text.starts_with(p.as_str()));
            let occurrences: usize = prefixes.iter().map(|p| s.text.matches(p.as_str()).count()).sum();
            leads && occurrences == 1
        },
    },
    Rule {
        // Structural fallback: many chat UIs right-align the current user's
        // bubble without any semantic marker.
        name: "flex-end",
        test: |_, s| s.layout.is_trailing(),
    },
];

pub struct Classifier {
    vocabulary: Vocabulary,
    ui_keywords: Vec<String>,
    upload_keywords: Vec<String>,
    extension_pattern: Option<Regex>,
    file_descendants: Vec<Selector>,
    user_descendants: Vec<Selector>,
    file_rules: Vec<Rule>,
    chrome_rules: Vec<Rule>,
    user_rules: Vec<Rule>,
}

impl Classifier {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self {
            ui_keywords: lowercase_all(&vocabulary.ui_keywords),
            upload_keywords: lowercase_all(&vocabulary.upload_keywords),
            extension_pattern: build_extension_pattern(&vocabulary.file_extensions),
            file_descendants: parse_selectors(&vocabulary.file_descendant_selectors),
            user_descendants: parse_selectors(&vocabulary.user_descendant_selectors),
            file_rules: FILE_RULES.to_vec(),
            chrome_rules: CHROME_RULES.to_vec(),
            user_rules: USER_RULES.to_vec(),
            vocabulary,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Appends a rule to the table of `class`. `Unclassified` has no table.
    pub fn push_rule(&mut self, class: Classification, rule: Rule) {
        match class {
            Classification::FileUploadRecord => self.file_rules.push(rule),
            Classification::UiChrome => self.chrome_rules.push(rule),
            Classification::UserMessage => self.user_rules.push(rule),
            Classification::Unclassified => {}
        }
    }

    pub fn rules(&self, class: Classification) -> &[Rule] {
        match class {
            Classification::FileUploadRecord => &self.file_rules,
            Classification::UiChrome => &self.chrome_rules,
            Classification::UserMessage => &self.user_rules,
            Classification::Unclassified => &[],
        }
    }

    pub fn classify(&self, subject: &Subject<'_>) -> Classification {
        self.explain(subject).0
    }

    /// Classification plus the name of the rule that decided it.
    pub fn explain(&self, subject: &Subject<'_>) -> (Classification, Option<&'static str>) {
        if let Some(rule) = self.first_match(&self.file_rules, subject) {
            return (Classification::FileUploadRecord, Some(rule));
        }
        if let Some(rule) = self.first_match(&self.chrome_rules, subject) {
            return (Classification::UiChrome, Some(rule));
        }
        if !meets_extraction_floor(subject.text) {
            return (Classification::Unclassified, None);
        }
        match self.first_match(&self.user_rules, subject) {
            Some(rule) => (Classification::UserMessage, Some(rule)),
            None => (Classification::Unclassified, None),
        }
    }

    pub fn is_file_upload_record(&self, subject: &Subject<'_>) -> bool {
        self.first_match(&self.file_rules, subject).is_some()
    }

    pub fn is_ui_chrome(&self, subject: &Subject<'_>) -> bool {
        self.first_match(&self.chrome_rules, subject).is_some()
    }

    /// The raw user-marker test, without the exclusions `classify` applies.
    pub fn is_user_message(&self, subject: &Subject<'_>) -> bool {
        self.first_match(&self.user_rules, subject).is_some()
    }

    pub fn has_file_extension(&self, text: &str) -> bool {
        self.extension_pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(text))
    }

    fn first_match(&self, rules: &[Rule], subject: &Subject<'_>) -> Option<&'static str> {
        rules
            .iter()
            .find(|rule| (rule.test)(self, subject))
            .map(|rule| rule.name)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(Vocabulary::default())
    }
}

fn has_user_attribute(classifier: &Classifier, element: ElementRef<'_>) -> bool {
    classifier
        .vocabulary
        .user_attributes
        .iter()
        .any(|(name, value)| {
            element
                .value()
                .attr(name)
                .is_some_and(|actual| actual.trim().eq_ignore_ascii_case(value))
        })
}

fn contains_any(lowered: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|keyword| lowered.contains(keyword.as_str()))
}

fn matches_descendant(element: ElementRef<'_>, selectors: &[Selector]) -> bool {
    descendant_elements(element).any(|el| selectors.iter().any(|sel| sel.matches(&el)))
}

fn lowercase_all(items: &[String]) -> Vec<String> {
    items.iter().map(|item| item.to_lowercase()).collect()
}

fn parse_selectors(raw: &[String]) -> Vec<Selector> {
    raw.iter()
        .filter_map(|selector| match Selector::parse(selector) {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                outline_warn!("Ignoring unparseable classifier selector {:?}", selector);
                None
            }
        })
        .collect()
}

/// `name.ext` where the dot follows a non-separator and no alphanumeric
/// continues the extension ("report.pdf" yes, "a.pdfx" and ".pdf" alone no).
fn build_extension_pattern(extensions: &[String]) -> Option<Regex> {
    let alternatives: Vec<String> = extensions
        .iter()
        .map(|ext| ext.trim_start_matches('.'))
        .filter(|ext| !ext.is_empty())
        .map(regex::escape)
        .collect();
    if alternatives.is_empty() {
        return None;
    }
    let pattern = format!(
        r"(?i)[^\s./\\]\.(?:{})(?:[^a-z0-9]|$)",
        alternatives.join("|")
    );
    match Regex::new(&pattern) {
        Ok(regex) => Some(regex),
        Err(err) => {
            outline_warn!("File extension pattern rejected: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sizes_are_recognised_in_any_case() {
        assert!(mentions_file_size("report.pdf 2.4 MB"));
        assert!(mentions_file_size("12kb"));
        assert!(mentions_file_size("1 TB archive"));
        assert!(!mentions_file_size("MB without a number"));
        assert!(!mentions_file_size("42 items"));
    }

    #[test]
    fn extension_pattern_needs_a_stem_and_a_boundary() {
        let classifier = Classifier::default();
        assert!(classifier.has_file_extension("report.pdf"));
        assert!(classifier.has_file_extension("看看 报告.PDF 吧"));
        assert!(classifier.has_file_extension("notes.md, please"));
        assert!(!classifier.has_file_extension("a.pdfx"));
        assert!(!classifier.has_file_extension("the .pdf format"));
        assert!(!classifier.has_file_extension("visit example.com today"));
    }

    #[test]
    fn empty_extension_list_never_matches() {
        let vocabulary = Vocabulary {
            file_extensions: Vec::new(),
            ..Vocabulary::default()
        };
        assert!(!Classifier::new(vocabulary).has_file_extension("report.pdf"));
    }

    #[test]
    fn rule_tables_are_inspectable_and_extensible() {
        let mut classifier = Classifier::default();
        let before = classifier.rules(Classification::UserMessage).len();
        classifier.push_rule(
            Classification::UserMessage,
            Rule {
                name: "always",
                test: |_, _| true,
            },
        );
        let names: Vec<_> = classifier
            .rules(Classification::UserMessage)
            .iter()
            .map(|rule| rule.name)
            .collect();
        assert_eq!(names.len(), before + 1);
        assert_eq!(names.last(), Some(&"always"));
        assert!(classifier.rules(Classification::Unclassified).is_empty());
    }
}
