//! Implementation of the `annos propagate` sub command.

use std::time::Instant;

use clap::Parser;
use indexmap::IndexMap;

use super::{
    load_per_namespace, load_propagated_annotations, read_leaf_annotations, resolve_alt_ids,
    to_features, AnnotationFormat, NamespaceFilter,
};
use crate::common::{init_thread_pool, trace_rss_now};
use crate::ontology::cli::{load_ontology, OntologyArgs};

/// Command line arguments for `annos propagate` sub command.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Propagate leaf annotations by the true-path rule",
    long_about = None
)]
pub struct Args {
    #[command(flatten)]
    pub ontology: OntologyArgs,

    /// Path to the leaf annotations (JSON or TSV, optionally gzip-compressed).
    #[arg(long, required = true)]
    pub path_in: String,
    /// Format of the input file, guessed from the file name if not given.
    #[arg(long, value_enum)]
    pub input_format: Option<AnnotationFormat>,
    /// Path to the output JSON file.
    #[arg(long, required = true)]
    pub path_out: String,

    /// Namespace to restrict to, "all" for all namespaces.
    #[arg(long, default_value = "all")]
    pub namespace: NamespaceFilter,
    /// Write one result per namespace, keyed by namespace id; ignores `--namespace`.
    #[arg(long, default_value_t = false)]
    pub per_namespace: bool,
    /// Map alternate ids to their current ids before propagation.
    #[arg(long, default_value_t = false)]
    pub resolve_alt_ids: bool,
    /// Write `{ protein: { term: 1 } }` features instead of term lists.
    #[arg(long, default_value_t = false)]
    pub as_features: bool,

    /// Number of threads to use (default is 1 thread per core).
    #[arg(long)]
    pub num_threads: Option<usize>,
}

/// Main entry point for `annos propagate` sub command.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("args_common = {:?}", &args_common);
    tracing::info!("args = {:?}", &args);

    init_thread_pool(args.num_threads)?;
    let graph = load_ontology(&args.ontology)?;

    tracing::info!("Loading leaf annotations...");
    let before_loading = Instant::now();
    let format = args
        .input_format
        .unwrap_or_else(|| AnnotationFormat::from_path(&args.path_in));
    let mut leaves = read_leaf_annotations(&args.path_in, format)?;
    if args.resolve_alt_ids {
        leaves = resolve_alt_ids(&graph, &leaves);
    }
    tracing::info!(
        "...done loading leaf annotations of {} proteins in {:?}",
        leaves.len(),
        before_loading.elapsed()
    );

    tracing::info!("Propagating annotations...");
    let before_propagating = Instant::now();
    let result = if args.per_namespace {
        load_per_namespace(&graph, &leaves)?
    } else {
        let mut result = IndexMap::new();
        result.insert(
            args.namespace.to_string(),
            load_propagated_annotations(&graph, &leaves, &args.namespace)?,
        );
        result
    };
    tracing::info!(
        "...done propagating annotations in {:?}",
        before_propagating.elapsed()
    );

    trace_rss_now();

    tracing::info!("Writing output to {}...", &args.path_out);
    match (args.per_namespace, args.as_features) {
        (true, true) => {
            let features = result
                .iter()
                .map(|(ns, annos)| (ns.clone(), to_features(annos)))
                .collect::<IndexMap<_, _>>();
            crate::common::io::write_json(&args.path_out, &features)?
        }
        (true, false) => crate::common::io::write_json(&args.path_out, &result)?,
        (false, true) => {
            let features = result.values().next().map(to_features).unwrap_or_default();
            crate::common::io::write_json(&args.path_out, &features)?
        }
        (false, false) => {
            let annos = result.into_values().next().unwrap_or_default();
            crate::common::io::write_json(&args.path_out, &annos)?
        }
    }

    Ok(())
}
