//! Layout catalog and alias table
//!
//! The catalog is the read-only registry of [`LayoutDescriptor`]s plus the
//! alias table mapping user-facing synonyms to canonical names in exactly
//! one hop. It is built once at startup from a TOML rule table (a compiled-in
//! default or a caller-supplied string), validated structurally at load, and
//! shared by reference into every resolution call.

mod registry;

pub use registry::{Catalog, CatalogError, LayoutDescriptor, DEFAULT_CATALOG};
