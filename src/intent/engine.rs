//! Scoring and ranking of intent patterns against a content block

use serde::Serialize;
use tracing::debug;

use crate::catalog::Catalog;
use crate::input::ContentBlock;

use super::config::{IntentConfig, IntentError};
use super::patterns::{IntentPattern, StructureHint, TomlIntents, DEFAULT_INTENTS};
use super::signals::IntentSignal;

/// A ranked layout recommendation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// Recommended layout name; may be an alias (resolved downstream)
    pub layout: String,
    /// Combined confidence in [0, 1]
    pub score: f64,
    /// The signal categories that contributed, for diagnostics
    pub signals: Vec<String>,
}

/// The recommendation engine: a static intent table plus scoring weights.
///
/// Built once at startup and shared read-only; `recommend` takes the block
/// and catalog by reference and owns nothing across calls.
#[derive(Debug, Clone)]
pub struct IntentEngine {
    patterns: Vec<IntentPattern>,
    config: IntentConfig,
}

impl IntentEngine {
    /// Create an engine with the default intent table
    pub fn new(config: IntentConfig) -> Result<Self, IntentError> {
        Self::from_toml_str(DEFAULT_INTENTS, config)
    }

    /// Create an engine from a TOML intent table
    pub fn from_toml_str(content: &str, config: IntentConfig) -> Result<Self, IntentError> {
        let parsed: TomlIntents = toml::from_str(content)?;
        Self::with_patterns(parsed.intent, config)
    }

    /// Create an engine from an explicit pattern list
    pub fn with_patterns(
        patterns: Vec<IntentPattern>,
        config: IntentConfig,
    ) -> Result<Self, IntentError> {
        config.validate()?;
        Ok(Self { patterns, config })
    }

    pub fn config(&self) -> &IntentConfig {
        &self.config
    }

    /// Rank layouts for a block lacking an explicit layout.
    ///
    /// Returns up to `max_results` recommendations in non-increasing score
    /// order; equal scores keep the declaration order of their pattern in
    /// the intent table. Never returns an empty list: when no candidate
    /// clears `min_confidence` the configured fallback chain is returned
    /// with zero scores.
    pub fn recommend(&self, block: &ContentBlock, catalog: &Catalog) -> Vec<Recommendation> {
        let signal = IntentSignal::extract(block);

        let mut ranked: Vec<Recommendation> = self
            .patterns
            .iter()
            .filter_map(|pattern| self.score_pattern(pattern, &signal, catalog))
            .filter(|rec| rec.score >= self.config.min_confidence)
            .collect();

        // Stable sort: ties stay in intent-table declaration order.
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(self.config.max_results);

        if ranked.is_empty() {
            debug!(fallback = ?self.config.fallback, "no intent cleared the confidence floor");
            return self
                .config
                .fallback
                .iter()
                .map(|layout| Recommendation {
                    layout: layout.clone(),
                    score: 0.0,
                    signals: vec!["fallback".to_string()],
                })
                .collect();
        }

        debug!(top = %ranked[0].layout, score = ranked[0].score, "ranked intents");
        ranked
    }

    fn score_pattern(
        &self,
        pattern: &IntentPattern,
        signal: &IntentSignal,
        catalog: &Catalog,
    ) -> Option<Recommendation> {
        let weights = &self.config.weights;
        let mut score = 0.0;
        let mut signals = Vec::new();

        let structure_fired = pattern.structure.is_some_and(|hint| match hint {
            StructureHint::Paired => signal.paired,
            StructureHint::Columns => signal.column_count.is_some(),
            StructureHint::Sequence => signal.sequenced,
            StructureHint::Numeric => signal.numeric,
        });
        if structure_fired {
            score += weights.structure;
            signals.push(format!("structure:{}", structure_name(pattern)));
        }

        let hits = pattern
            .keywords
            .iter()
            .filter(|k| signal.has_word(k))
            .count();
        if hits > 0 {
            let confidence = (hits as f64 / 2.0).min(1.0);
            score += weights.keyword * confidence;
            signals.push(format!("keyword:{hits}"));
        }

        // Explicit semantic hint: the block mentions the layout's canonical
        // name or one of its aliases (single-word tokens only).
        let canonical = catalog.resolve_name(&pattern.layout);
        let hinted = std::iter::once(canonical)
            .chain(std::iter::once(pattern.layout.as_str()))
            .chain(catalog.aliases_of(canonical))
            .filter(|token| token.chars().all(|c| c.is_alphanumeric()))
            .find(|token| signal.has_word(token));
        if let Some(token) = hinted {
            score += weights.intent;
            signals.push(format!("intent:{token}"));
        }

        // Compatibility: the detected shape is one the layout advertises.
        if structure_fired {
            let compatible = catalog
                .lookup(canonical)
                .map(|descriptor| descriptor.hints.iter().any(|h| h == structure_name(pattern)))
                .unwrap_or(false);
            if compatible {
                score += weights.compatibility;
                signals.push("compatibility".to_string());
            }
        }

        if signals.is_empty() {
            return None;
        }
        Some(Recommendation {
            layout: pattern.layout.clone(),
            score: score.min(1.0),
            signals,
        })
    }
}

fn structure_name(pattern: &IntentPattern) -> &'static str {
    match pattern.structure {
        Some(StructureHint::Paired) => "paired",
        Some(StructureHint::Columns) => "columns",
        Some(StructureHint::Sequence) => "sequence",
        Some(StructureHint::Numeric) => "numeric",
        None => "none",
    }
}
