//! Template mapping resolution, the pipeline orchestrator
//!
//! Resolves one content block into a placeholder-bound slide in four strictly
//! sequential steps: name resolution (recommendation if needed, then one
//! alias hop), schema validation/flattening, placeholder mapping, and markup
//! parsing of every bound text value. Warnings accumulate across all steps
//! and never abort resolution; the only fatal outcomes are an unresolvable
//! layout name and a violated structured pattern.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::catalog::{Catalog, LayoutDescriptor};
use crate::error::{ResolveError, Warning};
use crate::input::{ContentBlock, FieldValue};
use crate::intent::IntentEngine;
use crate::markup::{self, FormattedRun};
use crate::schema::SchemaRegistry;

/// Per-pipeline resolution options
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Ordered fallback chain tried when a name does not resolve; empty
    /// means no fallback is configured and unresolvable names are fatal
    pub fallback_layouts: Vec<String>,
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback layout chain
    pub fn with_fallback_layouts(mut self, fallback_layouts: Vec<String>) -> Self {
        self.fallback_layouts = fallback_layouts;
        self
    }
}

/// Resolved content for one placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PlaceholderValue {
    /// A single text value as formatted runs
    Text(Vec<FormattedRun>),
    /// A list value; each element parsed independently, in element order
    List(Vec<Vec<FormattedRun>>),
}

/// The fully resolved, placeholder-bound description of one block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSlide {
    /// Canonical layout name; always present in the catalog
    pub layout: String,
    /// Placeholder key to content; every key is declared by the layout
    pub placeholders: BTreeMap<String, PlaceholderValue>,
    /// Non-fatal findings from all resolution steps, in step order
    pub warnings: Vec<Warning>,
}

/// Resolve a single block against the catalog, schema registry, and intent
/// engine. See the module docs for the step sequence.
pub fn resolve_block(
    block: &ContentBlock,
    catalog: &Catalog,
    schemas: &SchemaRegistry,
    engine: &IntentEngine,
    options: &ResolveOptions,
) -> Result<ResolvedSlide, ResolveError> {
    let mut warnings: Vec<Warning> = Vec::new();

    // Step 1: name resolution.
    let requested = match &block.layout {
        Some(name) => name.clone(),
        None => {
            let recommendations = engine.recommend(block, catalog);
            debug!(layout = %recommendations[0].layout, score = recommendations[0].score,
                "no explicit layout; using top recommendation");
            recommendations[0].layout.clone()
        }
    };
    let canonical = resolve_layout_name(&requested, catalog, options, &mut warnings)?;
    let descriptor = catalog
        .lookup(&canonical)
        .ok_or_else(|| ResolveError::LayoutNotFound {
            name: requested.clone(),
        })?;

    // Step 2: shape validation and flattening.
    let flat = schemas.flatten(&canonical, &block.fields)?;

    // Steps 3 and 4: placeholder mapping and markup parsing.
    let mut placeholders = BTreeMap::new();
    for (field, value) in &flat {
        let Some(key) = descriptor.placeholder_for(field) else {
            warnings.push(Warning::UnknownField {
                layout: canonical.clone(),
                field: field.clone(),
            });
            continue;
        };
        if let Some(content) = bind_value(field, key, value, &mut warnings) {
            placeholders.insert(key.to_string(), content);
        }
    }
    note_unbound(descriptor, &placeholders, &mut warnings);

    debug!(layout = %canonical, bound = placeholders.len(), warnings = warnings.len(),
        "block resolved");
    Ok(ResolvedSlide {
        layout: canonical,
        placeholders,
        warnings,
    })
}

/// One alias hop, then catalog lookup; on a miss walk the fallback chain.
fn resolve_layout_name(
    requested: &str,
    catalog: &Catalog,
    options: &ResolveOptions,
    warnings: &mut Vec<Warning>,
) -> Result<String, ResolveError> {
    let resolved = catalog.resolve_name(requested);
    if catalog.contains(resolved) {
        return Ok(resolved.to_string());
    }

    for fallback in &options.fallback_layouts {
        let candidate = catalog.resolve_name(fallback);
        if catalog.contains(candidate) {
            warnings.push(Warning::FallbackSubstituted {
                requested: requested.to_string(),
                substituted: candidate.to_string(),
            });
            return Ok(candidate.to_string());
        }
    }

    Err(ResolveError::LayoutNotFound {
        name: requested.to_string(),
    })
}

/// Convert one flattened field value into placeholder content
fn bind_value(
    field: &str,
    placeholder: &str,
    value: &FieldValue,
    warnings: &mut Vec<Warning>,
) -> Option<PlaceholderValue> {
    match value {
        FieldValue::Text(text) => {
            let parsed = markup::parse(text);
            if parsed.degraded {
                warnings.push(Warning::MarkupDegraded {
                    placeholder: placeholder.to_string(),
                });
            }
            Some(PlaceholderValue::Text(parsed.runs))
        }
        FieldValue::List(items) => {
            let mut elements = Vec::with_capacity(items.len());
            let mut degraded = false;
            for item in items {
                match item {
                    FieldValue::Text(text) => {
                        let parsed = markup::parse(text);
                        degraded |= parsed.degraded;
                        elements.push(parsed.runs);
                    }
                    _ => warnings.push(Warning::UnsupportedShape {
                        field: field.to_string(),
                    }),
                }
            }
            if degraded {
                warnings.push(Warning::MarkupDegraded {
                    placeholder: placeholder.to_string(),
                });
            }
            Some(PlaceholderValue::List(elements))
        }
        FieldValue::Map(_) => {
            warnings.push(Warning::UnsupportedShape {
                field: field.to_string(),
            });
            None
        }
    }
}

/// Record a warning for every declared placeholder left unpopulated
fn note_unbound(
    descriptor: &LayoutDescriptor,
    placeholders: &BTreeMap<String, PlaceholderValue>,
    warnings: &mut Vec<Warning>,
) {
    for (field, key) in &descriptor.placeholders {
        if !placeholders.contains_key(key) {
            warnings.push(Warning::UnboundPlaceholder {
                placeholder: key.clone(),
                required: descriptor.is_required(field),
            });
        }
    }
}
