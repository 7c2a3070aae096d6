//! Implementation of the `scores reconcile` sub command.

use std::time::Instant;

use clap::Parser;

use super::{reconcile_predictions, Predictions};
use crate::common::{init_thread_pool, trace_rss_now};
use crate::ontology::cli::{load_ontology, OntologyArgs};

/// Command line arguments for `scores reconcile` sub command.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Make predicted scores consistent with the ontology",
    long_about = "Raise the score of each term to at least the scores of all its descendants"
)]
pub struct Args {
    #[command(flatten)]
    pub ontology: OntologyArgs,

    /// Path to the predictions JSON `{ protein: { term: score } }`.
    #[arg(long, required = true)]
    pub path_in: String,
    /// Path to the output JSON file.
    #[arg(long, required = true)]
    pub path_out: String,

    /// Number of threads to use (default is 1 thread per core).
    #[arg(long)]
    pub num_threads: Option<usize>,
}

/// Main entry point for `scores reconcile` sub command.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("args_common = {:?}", &args_common);
    tracing::info!("args = {:?}", &args);

    init_thread_pool(args.num_threads)?;
    let graph = load_ontology(&args.ontology)?;

    tracing::info!("Loading predictions...");
    let before_loading = Instant::now();
    let predictions: Predictions = crate::common::io::read_json(&args.path_in)?;
    tracing::info!(
        "...done loading predictions for {} proteins in {:?}",
        predictions.len(),
        before_loading.elapsed()
    );

    tracing::info!("Reconciling scores...");
    let before_reconciling = Instant::now();
    let result = reconcile_predictions(&graph, &predictions);
    tracing::info!(
        "...done reconciling scores in {:?}",
        before_reconciling.elapsed()
    );

    trace_rss_now();

    tracing::info!("Writing output to {}...", &args.path_out);
    crate::common::io::write_json(&args.path_out, &result)?;

    Ok(())
}

#[cfg(test)]
mod test {
    use float_cmp::approx_eq;

    use super::Args;
    use crate::ontology::cli::OntologyArgs;
    use crate::ontology::config::Preset;
    use crate::scores::Predictions;

    #[test]
    fn smoke_test_run() -> Result<(), anyhow::Error> {
        let tmpdir = temp_testdir::TempDir::default();
        let path_out = tmpdir.join("out.json");

        let args_common = Default::default();
        let args = Args {
            ontology: OntologyArgs {
                path_terms: "tests/data/toy_go.json".into(),
                preset: Preset::Go,
                path_config: None,
            },
            path_in: "tests/data/predictions.json".into(),
            path_out: path_out.to_str().expect("invalid path").into(),
            num_threads: None,
        };
        super::run(&args_common, &args)?;

        let result: Predictions = crate::common::io::read_json(&path_out)?;
        let p1 = &result["P00001"];
        assert_eq!(p1.len(), 7);
        assert!(approx_eq!(f64, p1["GO:0000002"], 0.8, ulps = 2));
        assert!(approx_eq!(f64, p1["GO:0008150"], 0.8, ulps = 2));
        assert!(approx_eq!(f64, p1["GO:0000011"], 0.6, ulps = 2));
        assert!(approx_eq!(f64, p1["GO:0005575"], 0.6, ulps = 2));
        let p2 = &result["P00002"];
        assert_eq!(p2.len(), 2);
        assert!(approx_eq!(f64, p2["GO:0003674"], 0.4, ulps = 2));

        Ok(())
    }
}
