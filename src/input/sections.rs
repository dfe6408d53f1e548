//! Section-delimited text input decoder
//!
//! Blocks are separated by `---` lines. Each block starts with a small
//! `key: value` header; a bare `key:` introduces a nested value built from
//! the following two-space-indented lines (a list of `- ` items, possibly
//! with their own `key: value` entries, or a flat sub-map). The `layout`
//! header names the target layout. Everything after the header is free text:
//! `- ` lines become list elements, other non-empty lines become paragraphs,
//! and the result lands in the `content` field.
//!
//! The decoder never fails; lines that fit no rule are kept as free text so
//! author input is not silently dropped.

use std::collections::BTreeMap;

use super::{ContentBlock, FieldValue};

/// Decode section-delimited text into content blocks.
///
/// Empty sections are skipped; an all-empty input yields no blocks.
pub fn decode_sections(source: &str) -> Vec<ContentBlock> {
    source
        .split_inclusive('\n')
        .map(|l| l.trim_end_matches(['\n', '\r']))
        .fold(vec![Vec::new()], |mut sections: Vec<Vec<&str>>, line| {
            if line.trim() == "---" {
                sections.push(Vec::new());
            } else if let Some(last) = sections.last_mut() {
                last.push(line);
            }
            sections
        })
        .into_iter()
        .map(parse_block)
        .filter(|block| !block.is_empty())
        .collect()
}

fn parse_block(lines: Vec<&str>) -> ContentBlock {
    let mut block = ContentBlock::new();
    let mut i = 0;

    // Header phase: key/value lines at indent zero, until a blank line or a
    // line that is not a header entry.
    while i < lines.len() {
        let line = lines[i];
        if line.trim().is_empty() {
            i += 1;
            // Leading blank lines do not end the header; a blank after at
            // least one entry does.
            if block.is_empty() {
                continue;
            }
            break;
        }
        let Some((key, rest)) = split_header(line) else {
            break;
        };
        i += 1;
        if !rest.is_empty() {
            if key == "layout" {
                block.layout = Some(rest.to_string());
            } else {
                block.fields.insert(key.to_string(), FieldValue::text(rest));
            }
            continue;
        }
        // Bare `key:` collects the indented lines below it.
        let mut nested: Vec<&str> = Vec::new();
        while i < lines.len() {
            let child = lines[i];
            if let Some(stripped) = child.strip_prefix("  ") {
                nested.push(stripped);
                i += 1;
            } else if child.trim().is_empty() && !nested.is_empty() {
                // Blank lines inside a nested value are tolerated.
                nested.push("");
                i += 1;
            } else {
                break;
            }
        }
        block
            .fields
            .insert(key.to_string(), parse_nested(&nested));
    }

    // Body phase: bullets and paragraphs become the content field.
    let mut elements: Vec<FieldValue> = Vec::new();
    let mut bulleted = false;
    for line in &lines[i..] {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(item) = trimmed.strip_prefix("- ") {
            elements.push(FieldValue::text(item));
            bulleted = true;
        } else {
            elements.push(FieldValue::text(trimmed));
        }
    }

    if !elements.is_empty() {
        let body = if elements.len() == 1 && !bulleted {
            elements.remove(0)
        } else {
            FieldValue::List(elements)
        };
        merge_content(&mut block, body);
    }

    block
}

/// Fold the body into `content` without clobbering an explicit header field.
fn merge_content(block: &mut ContentBlock, body: FieldValue) {
    match block.fields.remove("content") {
        None => {
            block.fields.insert("content".to_string(), body);
        }
        Some(existing) => {
            let mut items = match existing {
                FieldValue::List(items) => items,
                other => vec![other],
            };
            match body {
                FieldValue::List(more) => items.extend(more),
                other => items.push(other),
            }
            block
                .fields
                .insert("content".to_string(), FieldValue::List(items));
        }
    }
}

/// Split a `key: value` or `key:` header line. Returns None if the line does
/// not look like a header entry.
fn split_header(line: &str) -> Option<(&str, &str)> {
    let (key, rest) = line.split_once(':')?;
    let key = key.trim_end();
    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return None;
    }
    Some((key, rest.trim()))
}

/// Parse the indented lines under a bare `key:` into a list or map value.
fn parse_nested(lines: &[&str]) -> FieldValue {
    let first = lines.iter().find(|l| !l.trim().is_empty());
    match first {
        Some(l) if l.trim_start().starts_with("- ") => parse_nested_list(lines),
        _ => parse_nested_map(lines),
    }
}

fn parse_nested_list(lines: &[&str]) -> FieldValue {
    let mut items: Vec<FieldValue> = Vec::new();
    let mut current: Option<BTreeMap<String, FieldValue>> = None;

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix("- ") {
            if let Some(map) = current.take() {
                items.push(FieldValue::Map(map));
            }
            match split_header(rest) {
                Some((key, value)) if !value.is_empty() => {
                    let mut map = BTreeMap::new();
                    map.insert(key.to_string(), FieldValue::text(value));
                    current = Some(map);
                }
                _ => items.push(FieldValue::text(rest.trim())),
            }
        } else if let Some(rest) = line.strip_prefix("  ") {
            // Continuation of the current map item.
            match (current.as_mut(), split_header(rest)) {
                (Some(map), Some((key, value))) if !value.is_empty() => {
                    map.insert(key.to_string(), FieldValue::text(value));
                }
                _ => items.push(FieldValue::text(rest.trim())),
            }
        } else {
            items.push(FieldValue::text(line.trim()));
        }
    }
    if let Some(map) = current.take() {
        items.push(FieldValue::Map(map));
    }

    FieldValue::List(items)
}

fn parse_nested_map(lines: &[&str]) -> FieldValue {
    let mut map = BTreeMap::new();
    let mut loose: Vec<FieldValue> = Vec::new();

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        match split_header(line) {
            Some((key, value)) if !value.is_empty() => {
                map.insert(key.to_string(), FieldValue::text(value));
            }
            _ => loose.push(FieldValue::text(line.trim())),
        }
    }

    if map.is_empty() {
        // No recognizable entries; keep the raw lines as a list of text.
        FieldValue::List(loose)
    } else {
        FieldValue::Map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_single_block_header_and_body() {
        let blocks = decode_sections(
            "layout: title-slide\ntitle: Welcome\n\nA short opening paragraph\n",
        );
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].layout.as_deref(), Some("title-slide"));
        assert_eq!(blocks[0].get("title"), Some(&FieldValue::text("Welcome")));
        assert_eq!(
            blocks[0].get("content"),
            Some(&FieldValue::text("A short opening paragraph"))
        );
    }

    #[test]
    fn test_decode_multiple_blocks() {
        let blocks = decode_sections("title: One\n---\ntitle: Two\n---\ntitle: Three\n");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[2].get("title"), Some(&FieldValue::text("Three")));
    }

    #[test]
    fn test_decode_bullets_become_content_list() {
        let blocks = decode_sections("title: Agenda\n\n- first\n- second\n- third\n");
        assert_eq!(
            blocks[0].get("content"),
            Some(&FieldValue::List(vec![
                FieldValue::text("first"),
                FieldValue::text("second"),
                FieldValue::text("third"),
            ]))
        );
    }

    #[test]
    fn test_decode_nested_map_fields() {
        let blocks = decode_sections(
            "layout: comparison\ntitle: Rust vs Go\nleft:\n  title: Rust\n  content: Fast\nright:\n  title: Go\n  content: Simple\n",
        );
        let left = blocks[0].get("left").and_then(FieldValue::as_map).unwrap();
        assert_eq!(left.get("title"), Some(&FieldValue::text("Rust")));
        assert_eq!(left.get("content"), Some(&FieldValue::text("Fast")));
        let right = blocks[0].get("right").and_then(FieldValue::as_map).unwrap();
        assert_eq!(right.get("content"), Some(&FieldValue::text("Simple")));
    }

    #[test]
    fn test_decode_nested_list_of_maps() {
        let blocks = decode_sections(
            "layout: four-columns\ntitle: Quarters\ncolumns:\n  - title: Q1\n    content: Plan\n  - title: Q2\n    content: Build\n",
        );
        let columns = blocks[0]
            .get("columns")
            .and_then(FieldValue::as_list)
            .unwrap();
        assert_eq!(columns.len(), 2);
        let q1 = columns[0].as_map().unwrap();
        assert_eq!(q1.get("title"), Some(&FieldValue::text("Q1")));
        assert_eq!(q1.get("content"), Some(&FieldValue::text("Plan")));
    }

    #[test]
    fn test_decode_nested_list_of_text() {
        let blocks = decode_sections("columns:\n  - alpha\n  - beta\n");
        assert_eq!(
            blocks[0].get("columns"),
            Some(&FieldValue::List(vec![
                FieldValue::text("alpha"),
                FieldValue::text("beta"),
            ]))
        );
    }

    #[test]
    fn test_decode_body_merges_with_header_content() {
        let blocks = decode_sections("content: from header\n\n- extra\n");
        assert_eq!(
            blocks[0].get("content"),
            Some(&FieldValue::List(vec![
                FieldValue::text("from header"),
                FieldValue::text("extra"),
            ]))
        );
    }

    #[test]
    fn test_decode_non_header_line_starts_body() {
        // "not a header" has no colon, so it and everything after is body.
        let blocks = decode_sections("title: T\nnot a header\n- bullet\n");
        assert_eq!(
            blocks[0].get("content"),
            Some(&FieldValue::List(vec![
                FieldValue::text("not a header"),
                FieldValue::text("bullet"),
            ]))
        );
    }

    #[test]
    fn test_decode_empty_sections_skipped() {
        let blocks = decode_sections("---\n\n---\ntitle: Only\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].get("title"), Some(&FieldValue::text("Only")));
    }

    #[test]
    fn test_decode_empty_input() {
        assert!(decode_sections("").is_empty());
    }

    #[test]
    fn test_decode_crlf_input() {
        let blocks = decode_sections("title: One\r\n---\r\ntitle: Two\r\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].get("title"), Some(&FieldValue::text("Two")));
    }
}
