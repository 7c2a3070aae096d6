//! In-memory representation of an ontology term hierarchy (HPO, GO).

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::err::LookupError;

pub mod builder;
pub mod cli;
pub mod config;

pub use builder::{build_ontology, RawTerm};
pub use config::OntologyConfig;

/// A term of the ontology.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// Accession, e.g., `GO:0008150`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short namespace id.
    pub namespace: String,
    /// Direct parents, i.e., more general terms.
    pub parents: IndexSet<String>,
    /// Direct children; the exact inverse of `parents`.
    pub children: IndexSet<String>,
    /// 1 at namespace roots, 0 if unreachable from any root.
    pub depth: u32,
    /// Longest path from a parentless term plus one; always greater than the level of
    /// every parent.
    pub level: u32,
}

/// An ontology term graph.
///
/// Built once through [`build_ontology`] and read-only afterwards.
#[derive(Debug, Clone)]
pub struct OntologyGraph {
    config: OntologyConfig,
    terms: IndexMap<String, Term>,
    alt_ids: IndexMap<String, IndexSet<String>>,
}

impl OntologyGraph {
    /// The configuration the graph was built with.
    pub fn config(&self) -> &OntologyConfig {
        &self.config
    }

    /// Whether the term is part of the graph.
    pub fn contains(&self, term_id: &str) -> bool {
        self.terms.contains_key(term_id)
    }

    /// Look up a term by its current id.
    pub fn lookup(&self, term_id: &str) -> Result<&Term, LookupError> {
        self.get(term_id)
            .ok_or_else(|| LookupError::NotFound(term_id.to_string()))
    }

    pub fn get(&self, term_id: &str) -> Option<&Term> {
        self.terms.get(term_id)
    }

    /// Resolve an alternate id to the current ids it maps to; empty if unknown.
    pub fn resolve_alt(&self, term_id: &str) -> IndexSet<String> {
        self.alt_ids.get(term_id).cloned().unwrap_or_default()
    }

    /// All alternate ids with their targets.
    pub fn alt_ids(&self) -> &IndexMap<String, IndexSet<String>> {
        &self.alt_ids
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterate all terms in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Term> {
        self.terms.values()
    }

    /// Iterate the terms of namespace `namespace`.
    pub fn terms_in_namespace<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a Term> {
        self.terms.values().filter(move |t| t.namespace == namespace)
    }

    /// Iterate `(namespace id, root id)` pairs.
    pub fn namespace_roots(&self) -> impl Iterator<Item = (&str, &str)> {
        self.config.namespace_roots()
    }

    /// Terms with depth 0 that are not global roots.
    pub fn unreachable_terms(&self) -> impl Iterator<Item = &Term> {
        self.terms
            .values()
            .filter(|t| t.depth == 0 && !self.config.is_global_root(&t.id))
    }

    /// Depth of the term; 0 for unknown or unreachable terms.
    pub fn depth(&self, term_id: &str) -> u32 {
        self.terms.get(term_id).map(|t| t.depth).unwrap_or_default()
    }

    /// Topological level of the term; 0 for unknown terms.
    pub fn level(&self, term_id: &str) -> u32 {
        self.terms.get(term_id).map(|t| t.level).unwrap_or_default()
    }

    pub(crate) fn from_parts(
        config: OntologyConfig,
        terms: IndexMap<String, Term>,
        alt_ids: IndexMap<String, IndexSet<String>>,
    ) -> Self {
        Self {
            config,
            terms,
            alt_ids,
        }
    }
}
