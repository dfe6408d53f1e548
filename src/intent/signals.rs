//! Feature extraction from a content block
//!
//! An [`IntentSignal`] is the derived view of one block: its word set, and
//! whether its fields form a paired shape, an N-way column shape, a numbered
//! sequence, or carry large numbers and percentages. Computed per call,
//! never stored.

use std::collections::BTreeSet;

use crate::input::{ContentBlock, FieldValue};

/// Derived features of a block's text and shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentSignal {
    /// Lowercased word set of all text, including field names
    pub words: BTreeSet<String>,
    /// Two parallel content groups (left/right fields or a 2-map list)
    pub paired: bool,
    /// Column shape: a list of 3 to 6 parallel items
    pub column_count: Option<usize>,
    /// List items that read as numbered or sequential steps
    pub sequenced: bool,
    /// Large numbers or percentages anywhere in the text
    pub numeric: bool,
}

impl IntentSignal {
    /// Extract features from a block
    pub fn extract(block: &ContentBlock) -> Self {
        let mut words = BTreeSet::new();
        let mut texts: Vec<&str> = Vec::new();
        for (name, value) in &block.fields {
            collect_words(name, &mut words);
            collect_texts(value, &mut texts);
        }
        for text in &texts {
            collect_words(text, &mut words);
        }

        let paired = detect_paired(block);
        let column_count = detect_columns(block);
        let sequenced = detect_sequence(block);
        let numeric = texts.iter().any(|t| has_big_number_or_percent(t));

        Self {
            words,
            paired,
            column_count,
            sequenced,
            numeric,
        }
    }

    /// Whether a vocabulary word appears in the block
    pub fn has_word(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}

fn collect_texts<'a>(value: &'a FieldValue, out: &mut Vec<&'a str>) {
    match value {
        FieldValue::Text(t) => out.push(t),
        FieldValue::List(items) => {
            for item in items {
                collect_texts(item, out);
            }
        }
        FieldValue::Map(entries) => {
            for value in entries.values() {
                collect_texts(value, out);
            }
        }
    }
}

fn collect_words(text: &str, out: &mut BTreeSet<String>) {
    for word in text.split(|c: char| !c.is_alphanumeric()) {
        if !word.is_empty() {
            out.insert(word.to_lowercase());
        }
    }
}

/// Two parallel groups: explicit left/right fields, or any field holding a
/// list of exactly two maps.
fn detect_paired(block: &ContentBlock) -> bool {
    if block.fields.contains_key("left") && block.fields.contains_key("right") {
        return true;
    }
    block.fields.values().any(|value| {
        matches!(
            value.as_list(),
            Some(items) if items.len() == 2 && items.iter().all(|i| i.as_map().is_some())
        )
    })
}

/// Column shape: a field holding a list of 3 to 6 maps, or a field named
/// `columns` holding any list of 2 or more items.
fn detect_columns(block: &ContentBlock) -> Option<usize> {
    for (name, value) in &block.fields {
        let Some(items) = value.as_list() else {
            continue;
        };
        let all_maps = !items.is_empty() && items.iter().all(|i| i.as_map().is_some());
        if (3..=6).contains(&items.len()) && all_maps {
            return Some(items.len());
        }
        if name == "columns" && items.len() >= 2 {
            return Some(items.len().min(6));
        }
    }
    None
}

/// Numbered or sequential items: list entries starting with an ordinal
/// (`1.`, `2)`) or a step word.
fn detect_sequence(block: &ContentBlock) -> bool {
    const STEP_WORDS: [&str; 5] = ["first", "then", "next", "finally", "step"];

    let mut hits = 0usize;
    for value in block.fields.values() {
        let Some(items) = value.as_list() else {
            continue;
        };
        for item in items {
            let Some(text) = item.as_text() else {
                continue;
            };
            let trimmed = text.trim_start();
            let ordinal = trimmed
                .find(['.', ')'])
                .is_some_and(|pos| pos > 0 && trimmed[..pos].chars().all(|c| c.is_ascii_digit()));
            let lead_word = trimmed
                .split(|c: char| !c.is_alphanumeric())
                .next()
                .map(|w| w.to_lowercase());
            if ordinal || lead_word.is_some_and(|w| STEP_WORDS.contains(&w.as_str())) {
                hits += 1;
            }
        }
    }
    hits >= 2
}

/// A percent sign or an integer of three or more digits
fn has_big_number_or_percent(text: &str) -> bool {
    if text.contains('%') {
        return true;
    }
    let mut digits = 0usize;
    for c in text.chars() {
        if c.is_ascii_digit() {
            digits += 1;
            if digits >= 3 {
                return true;
            }
        } else if c != ',' {
            // Thousands separators do not break a digit run.
            digits = 0;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ContentBlock, FieldValue};
    use std::collections::BTreeMap;

    fn side(title: &str) -> FieldValue {
        let mut map = BTreeMap::new();
        map.insert("title".to_string(), FieldValue::text(title));
        FieldValue::Map(map)
    }

    #[test]
    fn test_word_extraction_lowercases_and_splits() {
        let block = ContentBlock::new().with_field("title", "Rust vs Go, Compared!");
        let signal = IntentSignal::extract(&block);
        assert!(signal.has_word("rust"));
        assert!(signal.has_word("vs"));
        assert!(signal.has_word("compared"));
        assert!(signal.has_word("title"));
        assert!(!signal.has_word("compared!"));
    }

    #[test]
    fn test_paired_via_left_right_fields() {
        let block = ContentBlock::new()
            .with_field("left", side("A"))
            .with_field("right", side("B"));
        assert!(IntentSignal::extract(&block).paired);
    }

    #[test]
    fn test_paired_via_two_map_list() {
        let block =
            ContentBlock::new().with_field("sides", FieldValue::List(vec![side("A"), side("B")]));
        assert!(IntentSignal::extract(&block).paired);
    }

    #[test]
    fn test_not_paired_for_flat_block() {
        let block = ContentBlock::new().with_field("title", "Hello");
        assert!(!IntentSignal::extract(&block).paired);
    }

    #[test]
    fn test_column_count_from_map_list() {
        let block = ContentBlock::new().with_field(
            "areas",
            FieldValue::List(vec![side("A"), side("B"), side("C"), side("D")]),
        );
        assert_eq!(IntentSignal::extract(&block).column_count, Some(4));
    }

    #[test]
    fn test_column_count_from_named_columns_field() {
        let block = ContentBlock::new().with_field(
            "columns",
            FieldValue::List(vec![FieldValue::text("a"), FieldValue::text("b")]),
        );
        assert_eq!(IntentSignal::extract(&block).column_count, Some(2));
    }

    #[test]
    fn test_sequence_detection() {
        let block = ContentBlock::new().with_field(
            "content",
            FieldValue::List(vec![
                FieldValue::text("1. gather requirements"),
                FieldValue::text("2. build"),
                FieldValue::text("3. ship"),
            ]),
        );
        assert!(IntentSignal::extract(&block).sequenced);
    }

    #[test]
    fn test_sequence_step_words() {
        let block = ContentBlock::new().with_field(
            "content",
            FieldValue::List(vec![
                FieldValue::text("First, listen"),
                FieldValue::text("Then act"),
            ]),
        );
        assert!(IntentSignal::extract(&block).sequenced);
    }

    #[test]
    fn test_single_ordinal_not_sequence() {
        let block = ContentBlock::new().with_field(
            "content",
            FieldValue::List(vec![FieldValue::text("1. alone")]),
        );
        assert!(!IntentSignal::extract(&block).sequenced);
    }

    #[test]
    fn test_numeric_detection() {
        let percent = ContentBlock::new().with_field("content", "growth of 12%");
        assert!(IntentSignal::extract(&percent).numeric);

        let big = ContentBlock::new().with_field("content", "we shipped 1,200 units");
        assert!(IntentSignal::extract(&big).numeric);

        let small = ContentBlock::new().with_field("content", "top 3 of 10");
        assert!(!IntentSignal::extract(&small).numeric);
    }
}
