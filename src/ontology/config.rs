//! Explicit configuration of one ontology: namespaces, their roots and the global roots.

use serde::{Deserialize, Serialize};

use crate::err::ConfigError;

/// Namespace filter keyword that selects all namespaces.
pub const ALL_NAMESPACES: &str = "all";

/// Definition of one namespace (sub-ontology).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDef {
    /// Short namespace id, e.g., `bp`.
    pub id: String,
    /// Long-form label as it appears in the raw term graph, e.g., `biological_process`.
    pub label: String,
    /// Root term of the namespace, if it has one.
    #[serde(default)]
    pub root: Option<String>,
}

impl NamespaceDef {
    fn new(id: &str, label: &str, root: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            root: root.map(str::to_string),
        }
    }
}

/// Configuration of an ontology build.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OntologyConfig {
    /// Name of the ontology, used in log messages.
    pub name: String,
    /// The closed set of namespaces.
    pub namespaces: Vec<NamespaceDef>,
    /// Terms above the namespace roots, e.g., `HP:0000001` ("All").
    #[serde(default)]
    pub global_roots: Vec<String>,
}

impl OntologyConfig {
    /// Configuration for the Gene Ontology.
    pub fn gene_ontology() -> Self {
        Self {
            name: "GO".to_string(),
            namespaces: vec![
                NamespaceDef::new("bp", "biological_process", Some("GO:0008150")),
                NamespaceDef::new("cc", "cellular_component", Some("GO:0005575")),
                NamespaceDef::new("mf", "molecular_function", Some("GO:0003674")),
            ],
            global_roots: Vec::new(),
        }
    }

    /// Configuration for the Human Phenotype Ontology.
    ///
    /// The sub-ontologies are hung below the global root `HP:0000001`, which lives in
    /// the rootless `hp` namespace.
    pub fn human_phenotype_ontology() -> Self {
        Self {
            name: "HPO".to_string(),
            namespaces: vec![
                NamespaceDef::new("pa", "phenotypic_abnormality", Some("HP:0000118")),
                NamespaceDef::new("mi", "mode_of_inheritance", Some("HP:0000005")),
                NamespaceDef::new("cm", "clinical_modifier", Some("HP:0012823")),
                NamespaceDef::new("fr", "frequency", Some("HP:0040279")),
                NamespaceDef::new("hp", "human_phenotype", None),
            ],
            global_roots: vec!["HP:0000001".to_string()],
        }
    }

    /// Check the configuration for consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.namespaces.is_empty() {
            return Err(ConfigError::NoNamespaces(self.name.clone()));
        }
        let mut ids = indexmap::IndexSet::new();
        let mut labels = indexmap::IndexSet::new();
        for ns in &self.namespaces {
            if ns.id.is_empty() {
                return Err(ConfigError::EmptyNamespaceId);
            }
            if ns.id == ALL_NAMESPACES {
                return Err(ConfigError::ReservedNamespaceId(ns.id.clone()));
            }
            if !ids.insert(ns.id.as_str()) {
                return Err(ConfigError::DuplicateNamespaceId(ns.id.clone()));
            }
            if !labels.insert(ns.label.as_str()) {
                return Err(ConfigError::DuplicateNamespaceLabel(ns.label.clone()));
            }
        }
        Ok(())
    }

    /// Map a long-form namespace label to its short id.
    pub fn short_namespace(&self, label: &str) -> Option<&str> {
        self.namespaces
            .iter()
            .find(|ns| ns.label == label)
            .map(|ns| ns.id.as_str())
    }

    /// Whether `id` is a configured namespace id.
    pub fn has_namespace(&self, id: &str) -> bool {
        self.namespaces.iter().any(|ns| ns.id == id)
    }

    /// Iterate `(namespace id, root id)` for all namespaces that have a root.
    pub fn namespace_roots(&self) -> impl Iterator<Item = (&str, &str)> {
        self.namespaces
            .iter()
            .filter_map(|ns| ns.root.as_deref().map(|root| (ns.id.as_str(), root)))
    }

    /// Whether `term_id` is a namespace root or a global root.
    pub fn is_root(&self, term_id: &str) -> bool {
        self.is_global_root(term_id) || self.namespace_roots().any(|(_, root)| root == term_id)
    }

    /// Whether `term_id` is a global root.
    pub fn is_global_root(&self, term_id: &str) -> bool {
        self.global_roots.iter().any(|root| root == term_id)
    }
}

/// Selection of a built-in configuration.
#[derive(
    clap::ValueEnum,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum Preset {
    /// Gene Ontology
    #[default]
    Go,
    /// Human Phenotype Ontology
    Hpo,
}

impl From<Preset> for OntologyConfig {
    fn from(val: Preset) -> Self {
        match val {
            Preset::Go => OntologyConfig::gene_ontology(),
            Preset::Hpo => OntologyConfig::human_phenotype_ontology(),
        }
    }
}

/// Load a configuration from a JSON file, or fall back to `preset`.
pub fn load_config<P: AsRef<std::path::Path>>(
    path: Option<P>,
    preset: Preset,
) -> Result<OntologyConfig, anyhow::Error> {
    let config: OntologyConfig = match path {
        Some(path) => crate::common::io::read_json(path)?,
        None => preset.into(),
    };
    config.validate()?;
    tracing::debug!("ontology config = {:?}", &config);
    Ok(config)
}
