//! Catalog registry: descriptors, aliases, and load-time validation

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while loading the catalog. These are load-time
/// only; per-block resolution never produces them.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog TOML failed to parse
    #[error("failed to parse catalog TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Two layouts share a name
    #[error("duplicate layout definition: {name}")]
    DuplicateLayout { name: String },

    /// An alias points at a name that is itself an alias (chains and cycles
    /// both violate the single-hop rule)
    #[error("alias cycle: {alias} -> {target} is itself an alias")]
    AliasCycle { alias: String, target: String },

    /// An alias points at a name the catalog does not define
    #[error("alias {alias} targets unknown layout {target}")]
    UnknownAliasTarget { alias: String, target: String },

    /// A required or optional field has no placeholder mapping
    #[error("layout {layout} declares field {field} without a placeholder")]
    MissingPlaceholder { layout: String, field: String },
}

/// A layout as registered in the catalog; loaded once, never mutated
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutDescriptor {
    /// Canonical name
    pub name: String,
    /// Field paths that the layout expects to be populated
    #[serde(default)]
    pub required: Vec<String>,
    /// Field paths that may be populated
    #[serde(default)]
    pub optional: Vec<String>,
    /// Flat field name to placeholder key
    pub placeholders: BTreeMap<String, String>,
    /// Content hints used by the intent engine's compatibility signal
    #[serde(default)]
    pub hints: Vec<String>,
}

impl LayoutDescriptor {
    /// Placeholder key for a flat field name, if the layout declares one
    pub fn placeholder_for(&self, field: &str) -> Option<&str> {
        self.placeholders.get(field).map(|s| s.as_str())
    }

    /// Whether the layout declares a placeholder-backed field
    pub fn has_field(&self, field: &str) -> bool {
        self.placeholders.contains_key(field)
    }

    pub fn is_required(&self, field: &str) -> bool {
        self.required.iter().any(|f| f == field)
    }
}

#[derive(Debug, Deserialize)]
struct TomlCatalog {
    #[serde(default)]
    layout: Vec<LayoutDescriptor>,
    #[serde(default)]
    aliases: BTreeMap<String, String>,
}

/// The default catalog shipped with the crate
pub const DEFAULT_CATALOG: &str = r#"
[[layout]]
name = "title-slide"
required = ["title"]
optional = ["subtitle"]
hints = ["opening", "closing"]
[layout.placeholders]
title = "title"
subtitle = "subtitle"

[[layout]]
name = "section-header"
required = ["title"]
optional = ["text"]
hints = ["divider"]
[layout.placeholders]
title = "title"
text = "text"

[[layout]]
name = "title-and-content"
required = ["content"]
optional = ["title"]
hints = ["bullets", "prose"]
[layout.placeholders]
title = "title"
content = "body"

[[layout]]
name = "two-content"
required = ["content_left", "content_right"]
optional = ["title"]
hints = ["paired"]
[layout.placeholders]
title = "title"
content_left = "content_left"
content_right = "content_right"

[[layout]]
name = "comparison"
required = ["content_left", "content_right"]
optional = ["title", "title_left", "title_right"]
hints = ["paired", "versus"]
[layout.placeholders]
title = "title"
title_left = "title_left"
content_left = "content_left"
title_right = "title_right"
content_right = "content_right"

[[layout]]
name = "four-columns"
required = ["content_col1", "content_col2"]
optional = ["title", "title_col1", "title_col2", "title_col3", "title_col4", "content_col3", "content_col4"]
hints = ["columns"]
[layout.placeholders]
title = "title"
title_col1 = "title_col1"
content_col1 = "content_col1"
title_col2 = "title_col2"
content_col2 = "content_col2"
title_col3 = "title_col3"
content_col3 = "content_col3"
title_col4 = "title_col4"
content_col4 = "content_col4"

[[layout]]
name = "timeline"
required = ["content"]
optional = ["title"]
hints = ["sequence", "process"]
[layout.placeholders]
title = "title"
content = "body"

[[layout]]
name = "big-number"
required = ["number"]
optional = ["title", "description"]
hints = ["numeric", "metric"]
[layout.placeholders]
title = "title"
number = "number"
description = "description"

[aliases]
title = "title-slide"
welcome = "title-slide"
section = "section-header"
content = "title-and-content"
bullets = "title-and-content"
prose = "title-and-content"
split = "two-content"
compare = "comparison"
comparison-table = "comparison"
vs = "comparison"
versus = "comparison"
columns = "four-columns"
grid = "four-columns"
process = "timeline"
steps = "timeline"
roadmap = "timeline"
metrics = "big-number"
stats = "big-number"
kpi = "big-number"
"#;

/// Registry of layout descriptors plus the alias table.
///
/// Immutable after construction; there is no mutation path, so sharing `&Catalog`
/// across threads needs no coordination.
#[derive(Debug, Clone)]
pub struct Catalog {
    layouts: BTreeMap<String, LayoutDescriptor>,
    aliases: BTreeMap<String, String>,
}

impl Catalog {
    /// Load a catalog from a TOML rule table
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let parsed: TomlCatalog = toml::from_str(content)?;

        let mut layouts = BTreeMap::new();
        for descriptor in parsed.layout {
            for field in descriptor.required.iter().chain(&descriptor.optional) {
                if !descriptor.placeholders.contains_key(field) {
                    return Err(CatalogError::MissingPlaceholder {
                        layout: descriptor.name.clone(),
                        field: field.clone(),
                    });
                }
            }
            let name = descriptor.name.clone();
            if layouts.insert(name.clone(), descriptor).is_some() {
                return Err(CatalogError::DuplicateLayout { name });
            }
        }

        let catalog = Self {
            layouts,
            aliases: parsed.aliases,
        };
        catalog.validate_aliases()?;
        Ok(catalog)
    }

    /// Every alias must hit a canonical name in one hop: a target that is
    /// itself an alias key is a chain (or cycle), a target that is nothing
    /// at all is dangling. Checked once here, never at call time.
    fn validate_aliases(&self) -> Result<(), CatalogError> {
        for (alias, target) in &self.aliases {
            if self.aliases.contains_key(target) {
                return Err(CatalogError::AliasCycle {
                    alias: alias.clone(),
                    target: target.clone(),
                });
            }
            if !self.layouts.contains_key(target) {
                return Err(CatalogError::UnknownAliasTarget {
                    alias: alias.clone(),
                    target: target.clone(),
                });
            }
        }
        Ok(())
    }

    /// Look up a descriptor by canonical name
    pub fn lookup(&self, name: &str) -> Option<&LayoutDescriptor> {
        self.layouts.get(name)
    }

    /// Whether a canonical layout with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.layouts.contains_key(name)
    }

    /// Resolve a name through the alias table, exactly one hop.
    ///
    /// Canonical names (and unknown names) come back unchanged, so resolving
    /// is idempotent: `resolve_name(resolve_name(n)) == resolve_name(n)`.
    pub fn resolve_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(|s| s.as_str()).unwrap_or(name)
    }

    /// Whether a name is an alias key
    pub fn is_alias(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }

    /// All canonical names followed by all aliases
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layouts
            .keys()
            .map(|s| s.as_str())
            .chain(self.aliases.keys().map(|s| s.as_str()))
    }

    /// Aliases that resolve to the given canonical name
    pub fn aliases_of<'a>(&'a self, canonical: &'a str) -> impl Iterator<Item = &'a str> {
        self.aliases
            .iter()
            .filter(move |(_, target)| target.as_str() == canonical)
            .map(|(alias, _)| alias.as_str())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::from_toml_str(DEFAULT_CATALOG).expect("Default catalog should be valid TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_loads() {
        let catalog = Catalog::default();
        assert!(catalog.contains("title-slide"));
        assert!(catalog.contains("comparison"));
        assert!(catalog.contains("four-columns"));
        assert!(!catalog.contains("vs"));
    }

    #[test]
    fn test_lookup_descriptor_fields() {
        let catalog = Catalog::default();
        let comparison = catalog.lookup("comparison").expect("Should exist");
        assert_eq!(comparison.placeholder_for("content_left"), Some("content_left"));
        assert!(comparison.is_required("content_left"));
        assert!(!comparison.is_required("title_left"));
    }

    #[test]
    fn test_alias_single_hop() {
        let catalog = Catalog::default();
        assert_eq!(catalog.resolve_name("vs"), "comparison");
        assert_eq!(catalog.resolve_name("comparison"), "comparison");
        // Fixed point: a second resolution changes nothing.
        let once = catalog.resolve_name("metrics");
        assert_eq!(catalog.resolve_name(once), once);
    }

    #[test]
    fn test_unknown_name_passes_through() {
        let catalog = Catalog::default();
        assert_eq!(catalog.resolve_name("nonexistent"), "nonexistent");
    }

    #[test]
    fn test_names_cover_canonical_and_aliases() {
        let catalog = Catalog::default();
        let names: Vec<&str> = catalog.names().collect();
        assert!(names.contains(&"comparison"));
        assert!(names.contains(&"vs"));
    }

    #[test]
    fn test_aliases_of() {
        let catalog = Catalog::default();
        let aliases: Vec<&str> = catalog.aliases_of("big-number").collect();
        assert!(aliases.contains(&"metrics"));
        assert!(aliases.contains(&"stats"));
    }

    #[test]
    fn test_alias_chain_rejected() {
        let toml = r#"
[[layout]]
name = "a"
[layout.placeholders]
title = "title"

[aliases]
b = "a"
c = "b"
"#;
        let result = Catalog::from_toml_str(toml);
        assert!(matches!(result, Err(CatalogError::AliasCycle { .. })));
    }

    #[test]
    fn test_alias_self_cycle_rejected() {
        let toml = r#"
[[layout]]
name = "a"
[layout.placeholders]
title = "title"

[aliases]
loop = "loop"
"#;
        let result = Catalog::from_toml_str(toml);
        assert!(matches!(result, Err(CatalogError::AliasCycle { .. })));
    }

    #[test]
    fn test_dangling_alias_rejected() {
        let toml = r#"
[[layout]]
name = "a"
[layout.placeholders]
title = "title"

[aliases]
ghost = "nowhere"
"#;
        let result = Catalog::from_toml_str(toml);
        assert!(matches!(
            result,
            Err(CatalogError::UnknownAliasTarget { .. })
        ));
    }

    #[test]
    fn test_required_field_without_placeholder_rejected() {
        let toml = r#"
[[layout]]
name = "a"
required = ["missing"]
[layout.placeholders]
title = "title"
"#;
        let result = Catalog::from_toml_str(toml);
        assert!(matches!(
            result,
            Err(CatalogError::MissingPlaceholder { .. })
        ));
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = Catalog::from_toml_str("not toml {{{{");
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }
}
