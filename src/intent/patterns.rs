//! Static intent pattern table
//!
//! Each pattern names an intent family, the layout it recommends (canonical
//! or an alias; the resolver does the single alias hop), a keyword vocabulary,
//! and an optional structural shape. Declaration order in the table is the
//! tie-break when combined scores are equal.

use serde::Deserialize;

/// Structural shape an intent matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureHint {
    /// Two parallel content groups
    Paired,
    /// N-way column shape
    Columns,
    /// Numbered or sequential items
    Sequence,
    /// Large numbers or percentages
    Numeric,
}

/// One row of the intent table
#[derive(Debug, Clone, Deserialize)]
pub struct IntentPattern {
    /// Intent family name
    pub name: String,
    /// Recommended layout; may be an alias
    pub layout: String,
    /// Per-intent keyword vocabulary
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Structural shape, if the intent has one
    #[serde(default)]
    pub structure: Option<StructureHint>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TomlIntents {
    #[serde(default)]
    pub(crate) intent: Vec<IntentPattern>,
}

/// The default intent table for the default catalog
pub const DEFAULT_INTENTS: &str = r#"
[[intent]]
name = "comparison"
layout = "comparison"
keywords = ["vs", "versus", "compare", "comparison", "pros", "cons", "against", "tradeoffs"]
structure = "paired"

[[intent]]
name = "columns"
layout = "four-columns"
keywords = ["categories", "areas", "aspects", "pillars", "tracks"]
structure = "columns"

[[intent]]
name = "timeline"
layout = "timeline"
keywords = ["timeline", "roadmap", "process", "phases", "journey", "milestones", "plan"]
structure = "sequence"

[[intent]]
name = "metrics"
layout = "metrics"
keywords = ["growth", "revenue", "increase", "decrease", "percent", "total", "results"]
structure = "numeric"

[[intent]]
name = "opening"
layout = "title-slide"
keywords = ["welcome", "hello", "introduction", "agenda", "overview"]
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_intents_parse() {
        let parsed: TomlIntents =
            toml::from_str(DEFAULT_INTENTS).expect("Default intents should be valid TOML");
        assert_eq!(parsed.intent.len(), 5);
        assert_eq!(parsed.intent[0].name, "comparison");
        assert_eq!(parsed.intent[0].structure, Some(StructureHint::Paired));
        assert_eq!(parsed.intent[4].structure, None);
    }

    #[test]
    fn test_metrics_intent_targets_alias() {
        // The metrics intent deliberately names the `metrics` alias rather
        // than the canonical big-number layout; resolution hops it later.
        let parsed: TomlIntents = toml::from_str(DEFAULT_INTENTS).expect("Should parse");
        let metrics = parsed
            .intent
            .iter()
            .find(|p| p.name == "metrics")
            .expect("Should exist");
        assert_eq!(metrics.layout, "metrics");
    }
}
