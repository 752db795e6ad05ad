//! Category normalization
//!
//! Turns a transaction's raw category field into an ordered list of labels,
//! most specific first. The field reaches us in three shapes:
//!
//! - an already-decoded sequence (`["Food and Drink", "Restaurants"]`)
//! - a JSON array literal stored as text (`"[\"Food and Drink\"]"`)
//! - a stripped comma string (`"Food and Drink, Restaurants"`) or a
//!   Python-style list literal with single quotes
//!
//! Normalization never fails: anything unrecoverable yields no labels.

use tracing::debug;

use crate::models::RawCategory;

/// Normalize a raw category into trimmed, non-empty labels
pub fn normalize(raw: &RawCategory) -> Vec<String> {
    match raw {
        RawCategory::Labels(labels) => clean(labels.iter().map(String::as_str)),
        RawCategory::Text(text) => normalize_text(text),
    }
}

/// Normalize category text: strict JSON first, then the heuristic split
pub fn normalize_text(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if let Ok(labels) = serde_json::from_str::<Vec<String>>(trimmed) {
        return clean(labels.iter().map(String::as_str));
    }

    debug!(category = trimmed, "Category is not a JSON array, splitting");
    split_heuristic(trimmed)
}

/// First (most specific) label, if any
pub fn primary_label(raw: &RawCategory) -> Option<String> {
    normalize(raw).into_iter().next()
}

/// Whether the normalized labels contain `label` exactly (after trimming)
pub fn contains_label(raw: &RawCategory, label: &str) -> bool {
    let wanted = label.trim();
    normalize(raw).iter().any(|l| l == wanted)
}

fn split_heuristic(text: &str) -> Vec<String> {
    let inner = text.strip_prefix('[').unwrap_or(text);
    let inner = inner.strip_suffix(']').unwrap_or(inner);
    let unquoted: String = inner.chars().filter(|c| *c != '"' && *c != '\'').collect();
    clean(unquoted.split(','))
}

fn clean<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    labels
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected() -> Vec<String> {
        vec!["Food and Drink".to_string(), "Travel".to_string()]
    }

    #[test]
    fn test_all_shapes_agree() {
        let decoded = RawCategory::Labels(vec!["Food and Drink".into(), "Travel".into()]);
        let json = RawCategory::Text(r#"["Food and Drink", "Travel"]"#.into());
        let stripped = RawCategory::Text("Food and Drink, Travel".into());
        let python = RawCategory::Text("['Food and Drink', 'Travel']".into());

        assert_eq!(normalize(&decoded), expected());
        assert_eq!(normalize(&json), expected());
        assert_eq!(normalize(&stripped), expected());
        assert_eq!(normalize(&python), expected());
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            RawCategory::Text(r#"["Shops", " Supermarkets "]"#.into()),
            RawCategory::Text(",,Payment,  ,Credit Card,".into()),
            RawCategory::Labels(vec!["  Transfer ".into(), "".into(), "Debit".into()]),
        ];
        for raw in inputs {
            let once = normalize(&raw);
            let twice = normalize(&RawCategory::Labels(once.clone()));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_unparsable_yields_empty() {
        assert!(normalize_text("").is_empty());
        assert!(normalize_text("   ").is_empty());
        assert!(normalize_text("[]").is_empty());
        assert!(normalize_text("[\"\", \"  \"]").is_empty());
        assert!(normalize_text("[,,]").is_empty());
    }

    #[test]
    fn test_json_with_non_string_falls_back() {
        // Not an array of strings, so the heuristic split takes over
        assert_eq!(normalize_text("[1, 2]"), vec!["1", "2"]);
    }

    #[test]
    fn test_single_label_without_brackets() {
        assert_eq!(normalize_text("Recreation"), vec!["Recreation"]);
    }

    #[test]
    fn test_primary_and_contains() {
        let raw = RawCategory::Text("Travel, Airlines and Aviation Services".into());
        assert_eq!(primary_label(&raw).as_deref(), Some("Travel"));
        assert!(contains_label(&raw, " Airlines and Aviation Services "));
        assert!(!contains_label(&raw, "Airlines"));
        assert_eq!(primary_label(&RawCategory::Text("[]".into())), None);
    }
}
