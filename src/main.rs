//! Ontology worker main executable

pub mod annos;
pub mod common;
pub mod err;
pub mod ontology;
pub mod propagate;
pub mod scores;

use clap::{Args, Parser, Subcommand};
use console::{Emoji, Term};

/// CLI parser based on clap.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Ontology annotation propagation",
    long_about = "This tool propagates HPO/GO annotations and predicted scores along the ontology"
)]
struct Cli {
    /// Commonly used arguments
    #[command(flatten)]
    common: common::Args,

    /// The sub command to run
    #[command(subcommand)]
    command: Commands,
}

/// Enum supporting the parsing of top-level commands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Ontology-related commands.
    Ontology(Ontology),
    /// Annotation-related commands.
    Annos(Annos),
    /// Score-related commands.
    Scores(Scores),
}

/// Parsing of "ontology *" sub commands.
#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true)]
struct Ontology {
    /// The sub command to run
    #[command(subcommand)]
    command: OntologyCommands,
}

/// Enum supporting the parsing of "ontology *" sub commands.
#[derive(Debug, Subcommand)]
enum OntologyCommands {
    Info(ontology::cli::Args),
}

/// Parsing of "annos *" sub commands.
#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true)]
struct Annos {
    /// The sub command to run
    #[command(subcommand)]
    command: AnnosCommands,
}

/// Enum supporting the parsing of "annos *" sub commands.
#[derive(Debug, Subcommand)]
enum AnnosCommands {
    Propagate(annos::cli::Args),
}

/// Parsing of "scores *" sub commands.
#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true)]
struct Scores {
    /// The sub command to run
    #[command(subcommand)]
    command: ScoresCommands,
}

/// Enum supporting the parsing of "scores *" sub commands.
#[derive(Debug, Subcommand)]
enum ScoresCommands {
    Reconcile(scores::cli::Args),
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Build a tracing subscriber according to the configuration in `cli.common`.
    let collector = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(match cli.common.verbose.log_level() {
            Some(level) => match level {
                log::Level::Error => tracing::Level::ERROR,
                log::Level::Warn => tracing::Level::WARN,
                log::Level::Info => tracing::Level::INFO,
                log::Level::Debug => tracing::Level::DEBUG,
                log::Level::Trace => tracing::Level::TRACE,
            },
            None => tracing::Level::INFO,
        })
        .compact()
        .finish();

    // Install collector and go into sub commands.
    let term = Term::stderr();
    tracing::subscriber::with_default(collector, || {
        match &cli.command {
            Commands::Ontology(ontology) => match &ontology.command {
                OntologyCommands::Info(args) => ontology::cli::run(&cli.common, args)?,
            },
            Commands::Annos(annos) => match &annos.command {
                AnnosCommands::Propagate(args) => annos::cli::run(&cli.common, args)?,
            },
            Commands::Scores(scores) => match &scores.command {
                ScoresCommands::Reconcile(args) => scores::cli::run(&cli.common, args)?,
            },
        }

        Ok::<(), anyhow::Error>(())
    })?;
    term.write_line(&format!("All done. Have a nice day!{}", Emoji(" 😃", "")))?;

    Ok(())
}
