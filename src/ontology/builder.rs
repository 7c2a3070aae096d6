//! Construction of an `OntologyGraph` from a pre-parsed raw term graph.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::{OntologyConfig, OntologyGraph, Term};
use crate::err::{BuildError, BuildWarning};

/// One term of the raw term graph as produced by the ontology file parser.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RawTerm {
    /// Accession of the term.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Long-form namespace label, e.g., `biological_process`.
    pub namespace: String,
    /// Targets of `is_a` edges.
    #[serde(default)]
    pub parents: Vec<String>,
    /// Targets of `part_of` relationships.
    #[serde(default)]
    pub part_of: Vec<String>,
    /// Alternate (retired) accessions of this term.
    #[serde(default)]
    pub alt_ids: Vec<String>,
    /// Whether the term is obsolete.
    #[serde(default)]
    pub is_obsolete: bool,
}

/// Build an `OntologyGraph` from raw terms.
///
/// Dangling parent references and cross-namespace `part_of` edges are dropped.
/// Terms that cannot be reached from any namespace root are kept with depth 0 and
/// reported in the returned warnings.
pub fn build_ontology<I>(
    raw_terms: I,
    config: OntologyConfig,
) -> Result<(OntologyGraph, Vec<BuildWarning>), BuildError>
where
    I: IntoIterator<Item = RawTerm>,
{
    let mut raw_by_id: IndexMap<String, RawTerm> = IndexMap::new();
    let mut obsolete = 0usize;
    for raw_term in raw_terms {
        if raw_term.is_obsolete {
            obsolete += 1;
            continue;
        }
        if raw_by_id.contains_key(&raw_term.id) {
            return Err(BuildError::DuplicateTerm(raw_term.id));
        }
        raw_by_id.insert(raw_term.id.clone(), raw_term);
    }
    if obsolete > 0 {
        tracing::debug!("skipped {} obsolete terms", obsolete);
    }

    let mut terms = instantiate_terms(&raw_by_id, &config)?;
    link_children(&mut terms);

    for (namespace, root) in config.namespace_roots() {
        if !terms.contains_key(root) {
            return Err(BuildError::MissingRoot {
                namespace: namespace.to_string(),
                root: root.to_string(),
            });
        }
    }
    assign_depths(&mut terms, &config);
    assign_levels(&mut terms);

    let warnings = terms
        .values()
        .filter(|t| t.depth == 0 && !config.is_global_root(&t.id))
        .map(|t| BuildWarning::UnreachableTerm(t.id.clone()))
        .collect::<Vec<_>>();
    if !warnings.is_empty() {
        tracing::warn!(
            "{}: {} term(s) are not reachable from any namespace root",
            &config.name,
            warnings.len()
        );
        for warning in &warnings {
            tracing::debug!("  {}", warning);
        }
    }

    let mut alt_ids: IndexMap<String, IndexSet<String>> = IndexMap::new();
    for raw_term in raw_by_id.values() {
        for alt_id in &raw_term.alt_ids {
            alt_ids
                .entry(alt_id.clone())
                .or_default()
                .insert(raw_term.id.clone());
        }
    }

    tracing::info!(
        "{}: built graph with {} terms and {} alternate ids",
        &config.name,
        terms.len(),
        alt_ids.len()
    );

    Ok((OntologyGraph::from_parts(config, terms, alt_ids), warnings))
}

/// Create one `Term` per raw term with mapped namespace and cleaned-up parents.
fn instantiate_terms(
    raw_by_id: &IndexMap<String, RawTerm>,
    config: &OntologyConfig,
) -> Result<IndexMap<String, Term>, BuildError> {
    let mut namespaces: IndexMap<&str, &str> = IndexMap::new();
    for raw_term in raw_by_id.values() {
        let namespace = config.short_namespace(&raw_term.namespace).ok_or_else(|| {
            BuildError::UnknownNamespace {
                term: raw_term.id.clone(),
                label: raw_term.namespace.clone(),
            }
        })?;
        namespaces.insert(raw_term.id.as_str(), namespace);
    }

    let mut dropped = 0usize;
    let mut terms = IndexMap::new();
    for raw_term in raw_by_id.values() {
        let namespace = namespaces[raw_term.id.as_str()];

        // `part_of` edges must not leave the namespace.
        let same_namespace_part_of = raw_term
            .part_of
            .iter()
            .filter(|target| namespaces.get(target.as_str()) == Some(&namespace));

        let mut parents = IndexSet::new();
        for parent in raw_term.parents.iter().chain(same_namespace_part_of) {
            if raw_by_id.contains_key(parent) {
                parents.insert(parent.clone());
            } else {
                tracing::trace!("dropping dangling parent {} of {}", parent, &raw_term.id);
                dropped += 1;
            }
        }

        terms.insert(
            raw_term.id.clone(),
            Term {
                id: raw_term.id.clone(),
                name: raw_term.name.clone(),
                namespace: namespace.to_string(),
                parents,
                children: IndexSet::new(),
                depth: 0,
                level: 0,
            },
        );
    }
    if dropped > 0 {
        tracing::debug!("dropped {} dangling parent references", dropped);
    }

    Ok(terms)
}

/// Fill `children` as the inverse of `parents`.
fn link_children(terms: &mut IndexMap<String, Term>) {
    let edges = terms
        .values()
        .flat_map(|t| t.parents.iter().map(move |p| (p.clone(), t.id.clone())))
        .collect::<Vec<_>>();
    for (parent, child) in edges {
        if let Some(parent) = terms.get_mut(&parent) {
            parent.children.insert(child);
        }
    }
}

/// Breadth-first layering from all namespace roots at once; first discovery wins.
fn assign_depths(terms: &mut IndexMap<String, Term>, config: &OntologyConfig) {
    let mut current = IndexSet::new();
    for (_, root) in config.namespace_roots() {
        if let Some(term) = terms.get_mut(root) {
            term.depth = 1;
            current.insert(root.to_string());
        }
    }

    let mut depth = 1;
    while !current.is_empty() {
        let mut next = IndexSet::new();
        for term_id in &current {
            for child in &terms[term_id.as_str()].children {
                if terms[child.as_str()].depth == 0 && !next.contains(child) {
                    next.insert(child.clone());
                }
            }
        }
        depth += 1;
        for term_id in &next {
            if let Some(term) = terms.get_mut(term_id) {
                term.depth = depth;
            }
        }
        current = next;
    }
}

/// Longest-path layering over the whole graph (Kahn's algorithm).
///
/// Terms on a cycle keep level 0.
fn assign_levels(terms: &mut IndexMap<String, Term>) {
    let mut pending = terms
        .values()
        .map(|t| (t.id.clone(), t.parents.len()))
        .collect::<IndexMap<_, _>>();
    let mut queue = terms
        .values()
        .filter(|t| t.parents.is_empty())
        .map(|t| t.id.clone())
        .collect::<std::collections::VecDeque<_>>();
    for term_id in &queue {
        if let Some(term) = terms.get_mut(term_id) {
            term.level = 1;
        }
    }

    while let Some(term_id) = queue.pop_front() {
        let (level, children) = {
            let term = &terms[term_id.as_str()];
            (term.level, term.children.iter().cloned().collect::<Vec<_>>())
        };
        for child in children {
            if let Some(term) = terms.get_mut(&child) {
                term.level = term.level.max(level + 1);
            }
            if let Some(count) = pending.get_mut(&child) {
                *count -= 1;
                if *count == 0 {
                    queue.push_back(child);
                }
            }
        }
    }
}
