//! Loading of leaf annotations and their propagation through the ontology.

use indexmap::IndexMap;
use itertools::Itertools;
use rayon::prelude::*;

use crate::err::AnnotationError;
use crate::ontology::config::ALL_NAMESPACES;
use crate::ontology::OntologyGraph;
use crate::propagate::transfer;

pub mod cli;

/// Annotations of proteins with terms, `{ protein: [term, ...] }`.
pub type Annotations = IndexMap<String, Vec<String>>;

/// Binary annotation features, `{ protein: { term: 1 } }`.
pub type Features = IndexMap<String, IndexMap<String, u8>>;

/// Namespace selection for annotation loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceFilter {
    /// Keep terms of all namespaces.
    All,
    /// Only keep terms of the given namespace id.
    Namespace(String),
}

impl std::str::FromStr for NamespaceFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == ALL_NAMESPACES {
            NamespaceFilter::All
        } else {
            NamespaceFilter::Namespace(s.to_string())
        })
    }
}

impl std::fmt::Display for NamespaceFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NamespaceFilter::All => write!(f, "{}", ALL_NAMESPACES),
            NamespaceFilter::Namespace(ns) => write!(f, "{}", ns),
        }
    }
}

/// Propagate leaf annotations by the true-path rule and strip the roots.
///
/// With a namespace filter, leaf terms are restricted to that namespace *before*
/// propagation and proteins without any remaining leaf term are dropped. With
/// `NamespaceFilter::All` every protein is kept, possibly with an empty list. Unknown
/// term ids are ignored. Term lists are sorted.
pub fn load_propagated_annotations(
    graph: &OntologyGraph,
    leaf_annotations: &Annotations,
    filter: &NamespaceFilter,
) -> Result<Annotations, AnnotationError> {
    if let NamespaceFilter::Namespace(ns) = filter {
        if !graph.config().has_namespace(ns) {
            return Err(AnnotationError::UnknownNamespace(ns.clone()));
        }
    }

    let result = leaf_annotations
        .par_iter()
        .filter_map(|(protein, leaves)| {
            let leaves = match filter {
                NamespaceFilter::All => leaves.iter().collect::<Vec<_>>(),
                NamespaceFilter::Namespace(ns) => {
                    let filtered = leaves
                        .iter()
                        .filter(|t| graph.get(t).map(|t| &t.namespace) == Some(ns))
                        .collect::<Vec<_>>();
                    if filtered.is_empty() {
                        return None;
                    }
                    filtered
                }
            };

            let terms = transfer(graph, leaves)
                .into_iter()
                .filter(|t| !graph.config().is_root(t))
                .sorted()
                .collect::<Vec<_>>();
            Some((protein.clone(), terms))
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        "propagated annotations of {} of {} proteins (namespace: {})",
        result.len(),
        leaf_annotations.len(),
        filter
    );

    Ok(result.into_iter().collect())
}

/// Run `load_propagated_annotations` for every namespace that has a root.
pub fn load_per_namespace(
    graph: &OntologyGraph,
    leaf_annotations: &Annotations,
) -> Result<IndexMap<String, Annotations>, AnnotationError> {
    graph
        .namespace_roots()
        .map(|(ns, _)| {
            let filter = NamespaceFilter::Namespace(ns.to_string());
            load_propagated_annotations(graph, leaf_annotations, &filter)
                .map(|annos| (ns.to_string(), annos))
        })
        .collect()
}

/// Replace term ids unknown to the graph by the current ids their alternate id
/// resolves to.
///
/// Ids that are neither current nor alternate are kept, the loader ignores them.
pub fn resolve_alt_ids(graph: &OntologyGraph, leaf_annotations: &Annotations) -> Annotations {
    let mut resolved = 0usize;
    let result = leaf_annotations
        .iter()
        .map(|(protein, terms)| {
            let terms = terms
                .iter()
                .flat_map(|term_id| {
                    let current = if graph.contains(term_id) {
                        Default::default()
                    } else {
                        graph.resolve_alt(term_id)
                    };
                    if current.is_empty() {
                        vec![term_id.clone()]
                    } else {
                        resolved += 1;
                        current.into_iter().collect()
                    }
                })
                .unique()
                .collect::<Vec<_>>();
            (protein.clone(), terms)
        })
        .collect();
    tracing::debug!("resolved {} alternate ids", resolved);
    result
}

/// Convert annotations to binary features.
pub fn to_features(annotations: &Annotations) -> Features {
    annotations
        .iter()
        .map(|(protein, terms)| {
            (
                protein.clone(),
                terms.iter().map(|t| (t.clone(), 1u8)).collect(),
            )
        })
        .collect()
}

/// Input format of leaf annotation files.
#[derive(
    clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum AnnotationFormat {
    /// JSON object `{ protein: [term, ...] }`.
    Json,
    /// Two-column tab-separated `protein<TAB>term`, `#` starts a comment.
    Tsv,
}

impl AnnotationFormat {
    /// Guess the format from the file name, defaulting to JSON.
    pub fn from_path<P: AsRef<std::path::Path>>(path: P) -> Self {
        let name = path
            .as_ref()
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let name = name.strip_suffix(".gz").unwrap_or(&name);
        if name.ends_with(".tsv") || name.ends_with(".txt") {
            AnnotationFormat::Tsv
        } else {
            AnnotationFormat::Json
        }
    }
}

/// Read leaf annotations from a possibly gzip-compressed file.
pub fn read_leaf_annotations<P: AsRef<std::path::Path>>(
    path: P,
    format: AnnotationFormat,
) -> Result<Annotations, anyhow::Error> {
    match format {
        AnnotationFormat::Json => crate::common::io::read_json(path),
        AnnotationFormat::Tsv => read_leaf_annotations_tsv(path),
    }
}

/// Read `protein<TAB>term` lines; repeated proteins accumulate terms.
fn read_leaf_annotations_tsv<P: AsRef<std::path::Path>>(
    path: P,
) -> Result<Annotations, anyhow::Error> {
    let reader = crate::common::io::open_read_maybe_gz(path.as_ref())?;
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut result = Annotations::new();
    for record in rdr.deserialize() {
        let (protein, term): (String, String) = record.map_err(|e| {
            anyhow::anyhow!("problem reading {:?}: {}", path.as_ref(), e)
        })?;
        let terms = result.entry(protein).or_default();
        if !terms.contains(&term) {
            terms.push(term);
        }
    }
    Ok(result)
}
