//! Structured field-shape patterns and their flatten rules
//!
//! Each pattern describes one nested authoring shape and owns a fixed,
//! deterministic rule for flattening it into the flat field set a layout's
//! placeholder table expects.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::input::FieldValue;

use super::SchemaViolation;

/// A registered structured shape for one layout
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructuredPattern {
    /// An ordered list of same-shaped items under `source`, flattened to
    /// `{key}_col{1..n}` in list order. Bare text items become
    /// `content_col{n}`.
    Columns {
        source: String,
        /// Upper bound on accepted items; extras are ignored by flattening
        /// (the layout has nowhere to put them)
        #[serde(default = "default_max_columns")]
        max: usize,
    },
    /// A two-sided paired structure under `left` and `right`, flattened to
    /// `{key}_{left|right}`. A bare text side becomes `content_{side}`.
    Paired,
}

fn default_max_columns() -> usize {
    4
}

impl StructuredPattern {
    /// Field paths the pattern requires to be present
    pub fn required_paths(&self) -> Vec<String> {
        match self {
            StructuredPattern::Columns { source, .. } => vec![source.clone()],
            StructuredPattern::Paired => vec!["left".to_string(), "right".to_string()],
        }
    }

    /// Validate the required groups and flatten the nested shape.
    ///
    /// On violation the whole conversion fails; no partially flattened
    /// mapping is ever returned. Fields not consumed by the pattern pass
    /// through unchanged.
    pub fn flatten(
        &self,
        layout: &str,
        fields: &BTreeMap<String, FieldValue>,
    ) -> Result<BTreeMap<String, FieldValue>, SchemaViolation> {
        match self {
            StructuredPattern::Columns { source, max } => {
                flatten_columns(layout, fields, source, *max)
            }
            StructuredPattern::Paired => flatten_paired(layout, fields),
        }
    }
}

fn flatten_columns(
    layout: &str,
    fields: &BTreeMap<String, FieldValue>,
    source: &str,
    max: usize,
) -> Result<BTreeMap<String, FieldValue>, SchemaViolation> {
    let items = match fields.get(source) {
        Some(FieldValue::List(items)) if !items.is_empty() => items,
        // Absent, empty, or the wrong shape all count as a missing group.
        _ => {
            return Err(SchemaViolation {
                layout: layout.to_string(),
                missing: vec![source.to_string()],
            })
        }
    };

    let mut flat = passthrough_except(fields, &[source]);
    for (index, item) in items.iter().take(max).enumerate() {
        let n = index + 1;
        match item {
            FieldValue::Map(entries) => {
                for (key, value) in entries {
                    flat.insert(format!("{key}_col{n}"), value.clone());
                }
            }
            other => {
                flat.insert(format!("content_col{n}"), other.clone());
            }
        }
    }
    Ok(flat)
}

fn flatten_paired(
    layout: &str,
    fields: &BTreeMap<String, FieldValue>,
) -> Result<BTreeMap<String, FieldValue>, SchemaViolation> {
    let missing: Vec<String> = ["left", "right"]
        .iter()
        .filter(|side| !fields.contains_key(**side))
        .map(|side| side.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SchemaViolation {
            layout: layout.to_string(),
            missing,
        });
    }

    let mut flat = passthrough_except(fields, &["left", "right"]);
    for side in ["left", "right"] {
        match &fields[side] {
            FieldValue::Map(entries) => {
                for (key, value) in entries {
                    flat.insert(format!("{key}_{side}"), value.clone());
                }
            }
            other => {
                flat.insert(format!("content_{side}"), other.clone());
            }
        }
    }
    Ok(flat)
}

/// Copy every field except the consumed structured sources
fn passthrough_except(
    fields: &BTreeMap<String, FieldValue>,
    consumed: &[&str],
) -> BTreeMap<String, FieldValue> {
    fields
        .iter()
        .filter(|(name, _)| !consumed.contains(&name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}
