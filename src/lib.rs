//! Slidecraft - content-to-layout resolution for slide authoring
//!
//! This library turns semi-structured authoring input (content blocks with
//! flat and nested fields, free text, and optional layout names) into fully
//! resolved, placeholder-bound slide descriptions ready for a rendering
//! backend. It parses inline emphasis, validates and flattens structured
//! field shapes, recommends layouts from content when none is named, and
//! maps fields to placeholders with graceful degradation.
//!
//! # Example
//!
//! ```rust
//! use slidecraft::{ContentBlock, Pipeline};
//!
//! let pipeline = Pipeline::new();
//! let block = ContentBlock::new()
//!     .with_layout("title-slide")
//!     .with_field("title", "**Launch** day")
//!     .with_field("subtitle", "Q3 review");
//!
//! let slide = pipeline.resolve(&block).unwrap();
//! assert_eq!(slide.layout, "title-slide");
//! ```

pub mod catalog;
pub mod error;
pub mod input;
pub mod intent;
pub mod markup;
pub mod resolver;
pub mod schema;

pub use catalog::{Catalog, CatalogError, LayoutDescriptor};
pub use error::{ResolveError, SchemaViolation, Warning};
pub use input::{decode_json, decode_sections, ContentBlock, FieldValue, InputError};
pub use intent::{IntentConfig, IntentEngine, IntentError, Recommendation, SignalWeights};
pub use markup::{FormattedRun, ParsedText, RunStyle};
pub use resolver::{resolve_block, PlaceholderValue, ResolveOptions, ResolvedSlide};
pub use schema::SchemaRegistry;

use thiserror::Error;

/// Errors that can occur while constructing a pipeline from custom rule
/// tables. Load-time only.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Catalog table failed to load or validate
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Intent table or configuration failed to load or validate
    #[error("intent error: {0}")]
    Intent(#[from] IntentError),

    /// Schema pattern table failed to parse
    #[error("failed to parse schema pattern TOML: {0}")]
    Patterns(#[source] toml::de::Error),
}

/// The resolution pipeline: catalog, schema registry, intent engine, and
/// resolution options, built once and shared read-only across calls.
///
/// Resolutions of distinct blocks are independent pure computations; a
/// `&Pipeline` can be shared across threads freely.
#[derive(Debug, Clone)]
pub struct Pipeline {
    catalog: Catalog,
    schemas: SchemaRegistry,
    engine: IntentEngine,
    options: ResolveOptions,
}

impl Pipeline {
    /// Create a pipeline with the default catalog, pattern table, intent
    /// table, and no fallback chain
    pub fn new() -> Self {
        Self {
            catalog: Catalog::default(),
            schemas: SchemaRegistry::default(),
            engine: IntentEngine::new(IntentConfig::default())
                .expect("Default intent configuration should validate"),
            options: ResolveOptions::default(),
        }
    }

    /// Build a pipeline from custom TOML rule tables
    pub fn from_tables(
        catalog_toml: &str,
        patterns_toml: &str,
        intents_toml: &str,
        config: IntentConfig,
    ) -> Result<Self, PipelineError> {
        Ok(Self {
            catalog: Catalog::from_toml_str(catalog_toml)?,
            schemas: SchemaRegistry::from_toml_str(patterns_toml)
                .map_err(PipelineError::Patterns)?,
            engine: IntentEngine::from_toml_str(intents_toml, config)?,
            options: ResolveOptions::default(),
        })
    }

    /// Replace the catalog
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replace the schema registry
    pub fn with_schemas(mut self, schemas: SchemaRegistry) -> Self {
        self.schemas = schemas;
        self
    }

    /// Replace the intent engine
    pub fn with_engine(mut self, engine: IntentEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Set the resolution options
    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Resolve one block into a placeholder-bound slide
    pub fn resolve(&self, block: &ContentBlock) -> Result<ResolvedSlide, ResolveError> {
        resolve_block(
            block,
            &self.catalog,
            &self.schemas,
            &self.engine,
            &self.options,
        )
    }

    /// Resolve a batch of blocks. Each block succeeds or fails on its own;
    /// one failing block never aborts the rest.
    pub fn resolve_all(&self, blocks: &[ContentBlock]) -> Vec<Result<ResolvedSlide, ResolveError>> {
        blocks.iter().map(|block| self.resolve(block)).collect()
    }

    /// Resolve a block, retrying a fatally failed block once against the
    /// first usable fallback layout with its fields treated as already flat.
    ///
    /// The retry records a fallback-substitution warning on the result. With
    /// no fallback chain configured this is identical to [`Pipeline::resolve`].
    pub fn resolve_or_fallback(&self, block: &ContentBlock) -> Result<ResolvedSlide, ResolveError> {
        let err = match self.resolve(block) {
            Ok(slide) => return Ok(slide),
            Err(err) => err,
        };

        let Some(fallback) = self
            .options
            .fallback_layouts
            .iter()
            .map(|name| self.catalog.resolve_name(name))
            .find(|name| self.catalog.contains(name))
        else {
            return Err(err);
        };
        let requested = match &err {
            ResolveError::LayoutNotFound { name } => name.clone(),
            ResolveError::Schema(violation) => violation.layout.clone(),
        };
        if requested == fallback {
            return Err(err);
        }

        let retry = ContentBlock {
            layout: Some(fallback.to_string()),
            fields: block.fields.clone(),
        };
        let mut slide = self.resolve(&retry)?;
        slide.warnings.insert(
            0,
            Warning::FallbackSubstituted {
                requested,
                substituted: fallback.to_string(),
            },
        );
        Ok(slide)
    }

    /// Rank layouts for a block without resolving it
    pub fn recommend(&self, block: &ContentBlock) -> Vec<Recommendation> {
        self.engine.recommend(block, &self.catalog)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode section-delimited text and resolve every block with a default
/// pipeline.
///
/// # Example
///
/// ```rust
/// let results = slidecraft::resolve_document("layout: title-slide\ntitle: Hello\n");
/// assert_eq!(results.len(), 1);
/// assert!(results[0].is_ok());
/// ```
pub fn resolve_document(source: &str) -> Vec<Result<ResolvedSlide, ResolveError>> {
    let pipeline = Pipeline::new();
    pipeline.resolve_all(&decode_sections(source))
}

/// Decode a structured JSON listing and resolve every block with a default
/// pipeline
pub fn resolve_json_document(
    source: &str,
) -> Result<Vec<Result<ResolvedSlide, ResolveError>>, InputError> {
    let pipeline = Pipeline::new();
    Ok(pipeline.resolve_all(&decode_json(source)?))
}
