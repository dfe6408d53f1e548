//! Frontmatter schema registry
//!
//! Maps canonical layout names to the structured authoring shape they accept
//! and flattens nested shapes into the flat field set the layout's
//! placeholder table expects. Layouts without a registered pattern take the
//! passthrough path: the input is assumed already flat and returned
//! unchanged. Passthrough is also what a caller gets when it retries a
//! failed block against a fallback layout, treating its fields as flat.

mod patterns;

pub use patterns::StructuredPattern;

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use crate::input::FieldValue;

/// A structured pattern's required field group was absent.
///
/// Fatal for the block that triggered it; carries the missing path list and
/// never a partial conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("layout {layout} is missing required structured fields: {}", missing.join(", "))]
pub struct SchemaViolation {
    pub layout: String,
    pub missing: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TomlPatterns {
    #[serde(default)]
    pattern: Vec<TomlPattern>,
}

#[derive(Debug, Deserialize)]
struct TomlPattern {
    layout: String,
    #[serde(flatten)]
    shape: StructuredPattern,
}

/// The default pattern table for the default catalog
pub const DEFAULT_PATTERNS: &str = r#"
[[pattern]]
layout = "four-columns"
kind = "columns"
source = "columns"
max = 4

[[pattern]]
layout = "comparison"
kind = "paired"

[[pattern]]
layout = "two-content"
kind = "paired"
"#;

/// Static per-layout pattern table; built once, read-only afterwards
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    patterns: BTreeMap<String, StructuredPattern>,
}

impl SchemaRegistry {
    /// Load a pattern table from TOML
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let parsed: TomlPatterns = toml::from_str(content)?;
        Ok(Self {
            patterns: parsed
                .pattern
                .into_iter()
                .map(|p| (p.layout, p.shape))
                .collect(),
        })
    }

    /// An empty registry; every layout takes the passthrough path
    pub fn empty() -> Self {
        Self {
            patterns: BTreeMap::new(),
        }
    }

    /// The pattern registered for a canonical layout name, if any
    pub fn pattern_for(&self, layout: &str) -> Option<&StructuredPattern> {
        self.patterns.get(layout)
    }

    /// Validate and flatten a raw field mapping for the given layout.
    ///
    /// With a registered pattern the required groups are checked and the
    /// nested shape flattened; without one the mapping passes through
    /// unchanged.
    pub fn flatten(
        &self,
        layout: &str,
        fields: &BTreeMap<String, FieldValue>,
    ) -> Result<BTreeMap<String, FieldValue>, SchemaViolation> {
        match self.patterns.get(layout) {
            Some(pattern) => pattern.flatten(layout, fields),
            None => Ok(fields.clone()),
        }
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::from_toml_str(DEFAULT_PATTERNS).expect("Default pattern table should be valid TOML")
    }
}
