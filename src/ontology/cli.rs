//! Command line interface for loading an ontology and the `ontology info` sub command.

use std::time::Instant;

use clap::Parser;
use indexmap::IndexMap;

use super::config::{load_config, Preset};
use super::{build_ontology, OntologyGraph, RawTerm};
use crate::common::trace_rss_now;

/// Arguments for selecting and loading an ontology.
#[derive(clap::Args, Debug, Clone)]
pub struct OntologyArgs {
    /// Path to the pre-parsed raw term graph (JSON, optionally gzip-compressed).
    #[arg(long, required = true)]
    pub path_terms: String,
    /// Built-in ontology configuration to use.
    #[arg(long, value_enum, default_value_t = Preset::Go)]
    pub preset: Preset,
    /// Path to a JSON ontology configuration, overrides `--preset`.
    #[arg(long)]
    pub path_config: Option<String>,
}

/// Load the ontology configuration and build the graph.
pub fn load_ontology(args: &OntologyArgs) -> Result<OntologyGraph, anyhow::Error> {
    let config = load_config(args.path_config.as_ref(), args.preset)?;

    tracing::info!("Loading {} terms...", &config.name);
    let before_loading = Instant::now();
    let raw_terms: Vec<RawTerm> = crate::common::io::read_json(&args.path_terms)?;
    tracing::info!(
        "...done loading {} raw terms in {:?}",
        raw_terms.len(),
        before_loading.elapsed()
    );

    tracing::info!("Building ontology graph...");
    let before_building = Instant::now();
    let (graph, warnings) = build_ontology(raw_terms, config)?;
    for warning in &warnings {
        tracing::trace!("{}", warning);
    }
    tracing::info!(
        "...done building ontology graph in {:?}",
        before_building.elapsed()
    );

    trace_rss_now();

    Ok(graph)
}

/// Command line arguments for `ontology info` sub command.
#[derive(Parser, Debug)]
#[command(author, version, about = "Print statistics of an ontology", long_about = None)]
pub struct Args {
    #[command(flatten)]
    pub ontology: OntologyArgs,

    /// Optional path to write the built terms to as JSON.
    #[arg(long)]
    pub path_out: Option<String>,
}

/// Per-namespace statistics.
#[derive(serde::Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct NamespaceStats {
    /// Number of terms.
    pub terms: usize,
    /// Maximal depth.
    pub max_depth: u32,
    /// Number of terms per depth.
    pub depths: IndexMap<u32, usize>,
}

/// Compute statistics for every namespace of `graph`.
pub fn namespace_stats(graph: &OntologyGraph) -> IndexMap<String, NamespaceStats> {
    graph
        .config()
        .namespaces
        .iter()
        .map(|ns| {
            let mut stats = NamespaceStats::default();
            for term in graph.terms_in_namespace(&ns.id) {
                stats.terms += 1;
                stats.max_depth = stats.max_depth.max(term.depth);
                *stats.depths.entry(term.depth).or_default() += 1;
            }
            stats.depths.sort_keys();
            (ns.id.clone(), stats)
        })
        .collect()
}

/// Main entry point for `ontology info` sub command.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("args_common = {:?}", &args_common);
    tracing::info!("args = {:?}", &args);

    let graph = load_ontology(&args.ontology)?;

    tracing::info!(
        "{} terms, {} alternate ids",
        graph.len(),
        graph.alt_ids().len()
    );
    for (ns, root) in graph.namespace_roots() {
        tracing::info!("  {} root: {} ({})", ns, root, &graph.lookup(root)?.name);
    }
    for (ns, stats) in namespace_stats(&graph) {
        tracing::info!(
            "  {}: {} terms, max depth {}",
            ns,
            stats.terms,
            stats.max_depth
        );
    }
    let unreachable = graph.unreachable_terms().collect::<Vec<_>>();
    if !unreachable.is_empty() {
        tracing::warn!("{} unreachable terms", unreachable.len());
        for term in unreachable {
            tracing::info!("  {} ({})", &term.id, &term.name);
        }
    }

    if let Some(path_out) = args.path_out.as_ref() {
        tracing::info!("Writing terms to {}...", path_out);
        let terms = graph.iter().collect::<Vec<_>>();
        crate::common::io::write_json(path_out, &terms)?;
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{load_ontology, namespace_stats, Args, OntologyArgs};
    use crate::ontology::config::Preset;
    use crate::ontology::Term;

    fn ontology_args() -> OntologyArgs {
        OntologyArgs {
            path_terms: "tests/data/toy_go.json".into(),
            preset: Preset::Go,
            path_config: None,
        }
    }

    #[test]
    fn load_with_preset_and_config_file() -> Result<(), anyhow::Error> {
        let from_preset = load_ontology(&ontology_args())?;
        let from_file = load_ontology(&OntologyArgs {
            path_config: Some("tests/data/toy_config.json".into()),
            ..ontology_args()
        })?;

        assert_eq!(from_preset.len(), from_file.len());
        assert_eq!(from_file.config().name, "toy GO");

        Ok(())
    }

    #[test]
    fn load_with_wrong_preset_fails() {
        let result = load_ontology(&OntologyArgs {
            preset: Preset::Hpo,
            ..ontology_args()
        });

        assert!(result.is_err());
    }

    #[test]
    fn stats() -> Result<(), anyhow::Error> {
        let graph = load_ontology(&ontology_args())?;

        let stats = namespace_stats(&graph);

        assert_eq!(stats.keys().collect::<Vec<_>>(), vec!["bp", "cc", "mf"]);
        assert_eq!(stats["bp"].terms, 6);
        assert_eq!(stats["bp"].max_depth, 4);
        assert_eq!(
            stats["bp"].depths.iter().collect::<Vec<_>>(),
            vec![(&0, &1), (&1, &1), (&2, &1), (&3, &2), (&4, &1)]
        );
        assert_eq!(stats["cc"].terms, 3);
        assert_eq!(stats["mf"].max_depth, 2);

        Ok(())
    }

    #[test]
    fn smoke_test_run() -> Result<(), anyhow::Error> {
        let tmpdir = temp_testdir::TempDir::default();
        let path_out = tmpdir.join("terms.json");

        let args_common = Default::default();
        let args = Args {
            ontology: ontology_args(),
            path_out: Some(path_out.to_str().expect("invalid path").into()),
        };
        super::run(&args_common, &args)?;

        let terms: Vec<Term> = crate::common::io::read_json(&path_out)?;
        assert_eq!(terms.len(), 11);
        assert_eq!(terms[0].id, "GO:0008150");
        assert_eq!(terms[0].depth, 1);

        Ok(())
    }
}
