//! Minimal layout resolution for the flex-end heuristic: `<style>` rules in
//! document order, then the inline `style` attribute.

use scraper::{ElementRef, Selector};

use crate::Document;

const TRACKED_PROPERTIES: &[&str] = &["align-self", "justify-content"];
const TRAILING: &str = "flex-end";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutHints {
    pub align_self: Option<String>,
    pub justify_content: Option<String>,
}

impl LayoutHints {
    /// True when the element sits on the trailing edge of its flex container.
    pub fn is_trailing(&self) -> bool {
        self.align_self.as_deref() == Some(TRAILING)
            || self.justify_content.as_deref() == Some(TRAILING)
    }

    fn apply(&mut self, property: &str, value: &str) {
        match property {
            "align-self" => self.align_self = Some(value.to_string()),
            "justify-content" => self.justify_content = Some(value.to_string()),
            _ => {}
        }
    }
}

struct StyleRule {
    selector: Selector,
    declarations: Vec<(String, String)>,
}

#[derive(Default)]
pub struct StyleSheet {
    rules: Vec<StyleRule>,
}

impl StyleSheet {
    /// Collects every `<style>` block of the document.
    pub fn from_document(document: &Document) -> Self {
        let css: String = document
            .select_all("style")
            .unwrap_or_default()
            .into_iter()
            .filter_map(|handle| document.element(handle))
            .flat_map(|el| el.text())
            .collect::<Vec<_>>()
            .join("\n");
        Self::parse(&css)
    }

    pub fn parse(css: &str) -> Self {
        Self {
            rules: parse_rules(css),
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Later rules win over earlier ones; inline declarations win over both.
    /// Specificity is not modelled.
    pub fn resolve(&self, element: ElementRef<'_>) -> LayoutHints {
        let mut hints = LayoutHints::default();
        for rule in &self.rules {
            if rule.selector.matches(&element) {
                for (property, value) in &rule.declarations {
                    hints.apply(property, value);
                }
            }
        }
        if let Some(inline) = element.value().attr("style") {
            for (property, value) in parse_declarations(inline) {
                hints.apply(&property, &value);
            }
        }
        hints
    }
}

fn parse_rules(css: &str) -> Vec<StyleRule> {
    let css = strip_comments(css);
    let mut rules = Vec::new();
    let mut rest = css.as_str();
    while let Some(open) = rest.find('{') {
        let prelude = rest[..open].trim();
        let after = &rest[open + 1..];
        let Some(close) = matching_brace(after) else {
            break;
        };
        let body = &after[..close];
        rest = &after[close + 1..];

        // @media, @keyframes and friends carry nested blocks we do not evaluate.
        if prelude.starts_with('@') {
            continue;
        }
        let Ok(selector) = Selector::parse(prelude) else {
            continue;
        };
        let declarations: Vec<_> = parse_declarations(body).collect();
        if !declarations.is_empty() {
            rules.push(StyleRule {
                selector,
                declarations,
            });
        }
    }
    rules
}

/// Offset of the `}` closing the block whose `{` precedes `s`.
fn matching_brace(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, ch) in s.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' if depth == 0 => return Some(idx),
            '}' => depth -= 1,
            _ => {}
        }
    }
    None
}

fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

fn parse_declarations(block: &str) -> impl Iterator<Item = (String, String)> + '_ {
    block.split(';').filter_map(|declaration| {
        let (property, value) = declaration.split_once(':')?;
        let property = property.trim().to_ascii_lowercase();
        if !TRACKED_PROPERTIES.contains(&property.as_str()) {
            return None;
        }
        let value = value
            .trim()
            .trim_end_matches("!important")
            .trim()
            .to_ascii_lowercase();
        Some((property, value))
    })
}
