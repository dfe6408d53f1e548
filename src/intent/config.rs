//! Configuration for the intent engine

use thiserror::Error;

/// Errors from validating intent configuration at load time
#[derive(Debug, Error)]
pub enum IntentError {
    /// Intent pattern TOML failed to parse
    #[error("failed to parse intent pattern TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Signal weights must sum to 1
    #[error("signal weights must sum to 1.0, got {sum}")]
    WeightSum { sum: f64 },

    /// The fallback chain backs the never-empty recommendation guarantee
    #[error("recommendation fallback chain must name at least one layout")]
    EmptyFallback,
}

/// Relative weight of each signal category in the combined score
#[derive(Debug, Clone, Copy)]
pub struct SignalWeights {
    pub structure: f64,
    pub keyword: f64,
    pub intent: f64,
    pub compatibility: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            structure: 0.4,
            keyword: 0.3,
            intent: 0.2,
            compatibility: 0.1,
        }
    }
}

impl SignalWeights {
    pub fn sum(&self) -> f64 {
        self.structure + self.keyword + self.intent + self.compatibility
    }
}

/// Configuration options for recommendation
#[derive(Debug, Clone)]
pub struct IntentConfig {
    /// Signal category weights; validated to sum to 1
    pub weights: SignalWeights,
    /// Minimum combined score for a recommendation to be included
    pub min_confidence: f64,
    /// Maximum number of recommendations returned
    pub max_results: usize,
    /// Ordered layouts returned when nothing clears the floor; must be
    /// non-empty so recommendation never yields zero results
    pub fallback: Vec<String>,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            weights: SignalWeights::default(),
            min_confidence: 0.6,
            max_results: 3,
            fallback: vec!["title-and-content".to_string(), "title-slide".to_string()],
        }
    }
}

impl IntentConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the signal weights
    pub fn with_weights(mut self, weights: SignalWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set the minimum confidence floor
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Set the maximum number of results
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Set the fallback layout chain
    pub fn with_fallback(mut self, fallback: Vec<String>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Check structural properties once, at load time
    pub fn validate(&self) -> Result<(), IntentError> {
        let sum = self.weights.sum();
        if (sum - 1.0).abs() > 1e-9 {
            return Err(IntentError::WeightSum { sum });
        }
        if self.fallback.is_empty() {
            return Err(IntentError::EmptyFallback);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IntentConfig::default();
        assert_eq!(config.weights.structure, 0.4);
        assert_eq!(config.weights.keyword, 0.3);
        assert_eq!(config.weights.intent, 0.2);
        assert_eq!(config.weights.compatibility, 0.1);
        assert_eq!(config.min_confidence, 0.6);
        assert_eq!(config.max_results, 3);
        config.validate().expect("Defaults should validate");
    }

    #[test]
    fn test_builder_pattern() {
        let config = IntentConfig::new()
            .with_min_confidence(0.8)
            .with_max_results(5);
        assert_eq!(config.min_confidence, 0.8);
        assert_eq!(config.max_results, 5);
    }

    #[test]
    fn test_empty_fallback_rejected() {
        let config = IntentConfig::new().with_fallback(Vec::new());
        assert!(matches!(config.validate(), Err(IntentError::EmptyFallback)));
    }

    #[test]
    fn test_bad_weight_sum_rejected() {
        let config = IntentConfig::new().with_weights(SignalWeights {
            structure: 0.5,
            keyword: 0.5,
            intent: 0.5,
            compatibility: 0.5,
        });
        assert!(matches!(
            config.validate(),
            Err(IntentError::WeightSum { .. })
        ));
    }
}
