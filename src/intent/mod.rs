//! Content-driven layout recommendation
//!
//! When a block names no layout, the intent engine scores its text and shape
//! against a static table of intent patterns and returns ranked
//! [`Recommendation`]s. Scoring combines independent signal confidences
//! (structure, keywords, explicit alias hints, layout compatibility) under
//! fixed weights. Below the confidence floor the engine answers with the
//! configured fallback chain instead of an empty list.

mod config;
mod engine;
mod patterns;
mod signals;

pub use config::{IntentConfig, IntentError, SignalWeights};
pub use engine::{IntentEngine, Recommendation};
pub use patterns::{IntentPattern, StructureHint, DEFAULT_INTENTS};
pub use signals::IntentSignal;
