//! Structured JSON input decoder
//!
//! Accepts either a top-level array of block objects or an object with a
//! `slides` array. Within a block object the `layout` key names the target
//! layout; every other key becomes a field. JSON scalars are carried as text,
//! arrays as lists, objects as nested maps.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use super::{ContentBlock, FieldValue};

/// Errors from decoding structured input
#[derive(Debug, Error)]
pub enum InputError {
    /// Input is not valid JSON
    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    /// Input parsed but does not have the expected block shape
    #[error("unexpected input shape: {message}")]
    UnexpectedShape { message: String },
}

/// Decode a JSON document into content blocks
pub fn decode_json(source: &str) -> Result<Vec<ContentBlock>, InputError> {
    let value: Value = serde_json::from_str(source)?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("slides") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(InputError::UnexpectedShape {
                    message: format!("\"slides\" must be an array, got {}", kind_name(&other)),
                })
            }
            None => {
                return Err(InputError::UnexpectedShape {
                    message: "expected an array of blocks or an object with \"slides\""
                        .to_string(),
                })
            }
        },
        other => {
            return Err(InputError::UnexpectedShape {
                message: format!("expected an array of blocks, got {}", kind_name(&other)),
            })
        }
    };

    items.into_iter().map(decode_block).collect()
}

fn decode_block(value: Value) -> Result<ContentBlock, InputError> {
    let Value::Object(obj) = value else {
        return Err(InputError::UnexpectedShape {
            message: format!("block must be an object, got {}", kind_name(&value)),
        });
    };

    let mut block = ContentBlock::new();
    for (key, value) in obj {
        if key == "layout" {
            match value {
                Value::String(name) => block.layout = Some(name),
                other => {
                    return Err(InputError::UnexpectedShape {
                        message: format!("\"layout\" must be a string, got {}", kind_name(&other)),
                    })
                }
            }
            continue;
        }
        if let Some(field) = decode_value(value) {
            block.fields.insert(key, field);
        }
    }
    Ok(block)
}

/// Convert a JSON value to a field value; nulls are dropped
fn decode_value(value: Value) -> Option<FieldValue> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(FieldValue::Text(b.to_string())),
        Value::Number(n) => Some(FieldValue::Text(n.to_string())),
        Value::String(s) => Some(FieldValue::Text(s)),
        Value::Array(items) => Some(FieldValue::List(
            items.into_iter().filter_map(decode_value).collect(),
        )),
        Value::Object(obj) => {
            let map: BTreeMap<String, FieldValue> = obj
                .into_iter()
                .filter_map(|(k, v)| decode_value(v).map(|v| (k, v)))
                .collect();
            Some(FieldValue::Map(map))
        }
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_array_of_blocks() {
        let blocks = decode_json(
            r#"[
                {"layout": "title-slide", "title": "Welcome", "subtitle": "2026"},
                {"title": "Agenda", "content": ["one", "two"]}
            ]"#,
        )
        .expect("Should decode");

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].layout.as_deref(), Some("title-slide"));
        assert_eq!(
            blocks[0].get("subtitle"),
            Some(&FieldValue::text("2026"))
        );
        assert_eq!(blocks[1].layout, None);
        assert_eq!(
            blocks[1].get("content"),
            Some(&FieldValue::List(vec![
                FieldValue::text("one"),
                FieldValue::text("two")
            ]))
        );
    }

    #[test]
    fn test_decode_slides_wrapper() {
        let blocks = decode_json(r#"{"slides": [{"title": "A"}]}"#).expect("Should decode");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].get("title"), Some(&FieldValue::text("A")));
    }

    #[test]
    fn test_decode_nested_maps() {
        let blocks = decode_json(
            r#"[{
                "layout": "comparison",
                "left": {"title": "Rust", "content": "fast"},
                "right": {"title": "Go", "content": "simple"}
            }]"#,
        )
        .expect("Should decode");

        let left = blocks[0].get("left").and_then(FieldValue::as_map).unwrap();
        assert_eq!(left.get("title"), Some(&FieldValue::text("Rust")));
    }

    #[test]
    fn test_decode_numbers_become_text() {
        let blocks = decode_json(r#"[{"number": 87, "growth": 12.5}]"#).expect("Should decode");
        assert_eq!(blocks[0].get("number"), Some(&FieldValue::text("87")));
        assert_eq!(blocks[0].get("growth"), Some(&FieldValue::text("12.5")));
    }

    #[test]
    fn test_decode_null_fields_dropped() {
        let blocks = decode_json(r#"[{"title": "A", "subtitle": null}]"#).expect("Should decode");
        assert!(blocks[0].get("subtitle").is_none());
    }

    #[test]
    fn test_decode_rejects_non_object_block() {
        let result = decode_json(r#"["not a block"]"#);
        assert!(matches!(result, Err(InputError::UnexpectedShape { .. })));
    }

    #[test]
    fn test_decode_rejects_non_string_layout() {
        let result = decode_json(r#"[{"layout": 3}]"#);
        assert!(matches!(result, Err(InputError::UnexpectedShape { .. })));
    }

    #[test]
    fn test_decode_invalid_json() {
        let result = decode_json("{{{");
        assert!(matches!(result, Err(InputError::Json(_))));
    }
}
