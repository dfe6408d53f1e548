//! Error and warning types for per-block resolution

use std::fmt;

use serde::Serialize;
use thiserror::Error;

pub use crate::schema::SchemaViolation;

/// Fatal, per-block resolution errors.
///
/// Either variant aborts only the block that triggered it; a multi-block
/// caller can retry against a fallback layout or drop the block and continue.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The explicit or recommended name does not resolve through the alias
    /// table or catalog, and no fallback layout chain is configured
    #[error("layout not found: {name}")]
    LayoutNotFound { name: String },

    /// A structured pattern's required field group is absent
    #[error(transparent)]
    Schema(#[from] SchemaViolation),
}

/// Non-fatal findings accumulated during resolution and returned with the
/// successful result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Warning {
    /// A field had no placeholder mapping and was dropped
    UnknownField { layout: String, field: String },
    /// A declared placeholder had no bound field and was left empty
    UnboundPlaceholder { placeholder: String, required: bool },
    /// Emphasis markup in a value was malformed and degraded to literal text
    MarkupDegraded { placeholder: String },
    /// A bound value had a shape that cannot become runs and was dropped
    UnsupportedShape { field: String },
    /// The requested layout was substituted with a fallback entry
    FallbackSubstituted { requested: String, substituted: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnknownField { layout, field } => {
                write!(
                    f,
                    "field \"{field}\" has no placeholder in layout \"{layout}\"; dropped"
                )
            }
            Warning::UnboundPlaceholder {
                placeholder,
                required,
            } => {
                let kind = if *required { "required" } else { "optional" };
                write!(f, "{kind} placeholder \"{placeholder}\" left empty")
            }
            Warning::MarkupDegraded { placeholder } => {
                write!(
                    f,
                    "unbalanced emphasis markers in \"{placeholder}\" kept as literal text"
                )
            }
            Warning::UnsupportedShape { field } => {
                write!(
                    f,
                    "field \"{field}\" has a nested shape the layout cannot hold; dropped"
                )
            }
            Warning::FallbackSubstituted {
                requested,
                substituted,
            } => {
                write!(
                    f,
                    "layout \"{requested}\" not in catalog; substituted fallback \"{substituted}\""
                )
            }
        }
    }
}
