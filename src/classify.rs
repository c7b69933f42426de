//! Classification hierarchy integration
//!
//! The classification scheme itself lives with an external collaborator;
//! the engine only resolves a feature's category name to a stable
//! identifier (and optional parent) through the [`ClassificationLookup`]
//! trait, and emits the hierarchy triples for resolved terms.

/// Resolved classification term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRef {
    /// Stable identifier of the term
    pub id: String,
    /// Identifier of the parent term, if the term is not a root
    pub parent: Option<String>,
}

impl CategoryRef {
    /// Create a root term reference
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent: None,
        }
    }

    /// Create a term reference with a parent
    pub fn with_parent(id: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent: Some(parent.into()),
        }
    }
}

/// Lookup into an externally managed classification hierarchy
///
/// Misses are expected (not every category name is classified) and must
/// never abort a feature.
pub trait ClassificationLookup {
    /// Resolve a category name to its term, or `None` when unclassified
    fn resolve(&self, category_name: &str) -> Option<CategoryRef>;
}

impl<F> ClassificationLookup for F
where
    F: Fn(&str) -> Option<CategoryRef>,
{
    fn resolve(&self, category_name: &str) -> Option<CategoryRef> {
        self(category_name)
    }
}
