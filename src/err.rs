//! Error and warning types of the ontology engine.

/// Fatal problems found while building an `OntologyGraph`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("term {term} has unknown namespace label {label:?}")]
    UnknownNamespace { term: String, label: String },
    #[error("term {0} occurs more than once in the raw term graph")]
    DuplicateTerm(String),
    #[error("root {root} of namespace {namespace} is not a term of the graph")]
    MissingRoot { namespace: String, root: String },
}

/// Non-fatal problems found while building an `OntologyGraph`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildWarning {
    /// The term has no path to any namespace root and keeps depth 0.
    UnreachableTerm(String),
}

impl std::fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildWarning::UnreachableTerm(id) => {
                write!(f, "term {} is not reachable from any namespace root", id)
            }
        }
    }
}

/// Direct lookup of a term failed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("term {0} not found")]
    NotFound(String),
}

/// Invalid ontology configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("configuration {0:?} defines no namespaces")]
    NoNamespaces(String),
    #[error("namespace id must not be empty")]
    EmptyNamespaceId,
    #[error("namespace id {0:?} is reserved")]
    ReservedNamespaceId(String),
    #[error("namespace id {0:?} defined more than once")]
    DuplicateNamespaceId(String),
    #[error("namespace label {0:?} defined more than once")]
    DuplicateNamespaceLabel(String),
}

/// Problems when loading propagated annotations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotationError {
    #[error("unknown namespace {0:?}")]
    UnknownNamespace(String),
}
