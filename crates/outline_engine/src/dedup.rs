use std::collections::HashSet;

use crate::Message;

/// Keeps the first message of every distinct text, in input order.
pub fn dedupe(messages: Vec<Message>) -> Vec<Message> {
    dedupe_by_key(messages, |message| message.text.as_str())
}

/// Stable first-wins deduplication on an exact string key.
pub fn dedupe_by_key<T, F>(items: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let mut seen: HashSet<String> = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(key(item).to_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::dedupe_by_key;

    fn dedupe_strs(items: &[&str]) -> Vec<String> {
        dedupe_by_key(
            items.iter().map(|s| s.to_string()).collect(),
            |s: &String| s.as_str(),
        )
    }

    #[test]
    fn first_occurrence_wins_and_order_is_kept() {
        assert_eq!(
            dedupe_strs(&["b", "a", "b", "c", "a"]),
            vec!["b".to_string(), "a".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn output_never_grows_and_is_a_fixed_point() {
        let inputs: [&[&str]; 4] = [
            &[],
            &["x"],
            &["same", "same", "same"],
            &["你好", "hello", "你好 ", "hello"],
        ];
        for input in inputs {
            let once = dedupe_strs(input);
            assert!(once.len() <= input.len());
            let refs: Vec<&str> = once.iter().map(String::as_str).collect();
            assert_eq!(dedupe_strs(&refs), once);
        }
    }

    #[test]
    fn equality_is_exact() {
        assert_eq!(dedupe_strs(&["Hello", "hello", "hello "]).len(), 3);
    }
}
