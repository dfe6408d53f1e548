//! Authoring input model and decoders
//!
//! A [`ContentBlock`] is the logical unit entering the pipeline: a mapping
//! from field name to [`FieldValue`] plus an optional explicit layout name.
//! Two physical encodings decode to it: a section-delimited text format
//! ([`decode_sections`]) and a structured JSON listing ([`decode_json`]).
//! The pipeline itself never cares which encoding produced a block.

mod sections;
mod structured;

pub use sections::decode_sections;
pub use structured::{decode_json, InputError};

use std::collections::BTreeMap;

use serde::Serialize;

/// A field value as authored: flat text, an ordered list, or a nested map.
///
/// The shape is resolved exactly once, at the schema registry boundary;
/// downstream components only ever see flat text and lists of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            FieldValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// One authored content block, immutable once received
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentBlock {
    /// Explicit layout name, if the author gave one; may be an alias
    pub layout: Option<String>,
    /// Field name to value, in name order
    pub fields: BTreeMap<String, FieldValue>,
}

impl ContentBlock {
    /// Create an empty block with no explicit layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the explicit layout name
    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    /// Add a field
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.layout.is_none() && self.fields.is_empty()
    }
}
