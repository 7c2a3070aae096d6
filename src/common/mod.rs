//! Common functionality.

use byte_unit::{Byte, UnitType};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};

pub mod io;

/// Commonly used command line arguments.
#[derive(Parser, Debug)]
pub struct Args {
    /// Verbosity of the program
    #[clap(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            verbose: Verbosity::new(0, 0),
        }
    }
}

/// Helper to print the current memory resident set size via `tracing`.
pub fn trace_rss_now() {
    let rss = procfs::process::Process::myself()
        .and_then(|me| me.stat())
        .map(|stat| stat.rss * procfs::page_size());
    match rss {
        Ok(rss) => tracing::debug!(
            "RSS now: {:.2}",
            Byte::from_u64(rss).get_appropriate_unit(UnitType::Binary)
        ),
        Err(e) => tracing::debug!("could not determine RSS: {}", e),
    }
}

/// Configure the global `rayon` thread pool if a thread count was given.
pub fn init_thread_pool(num_threads: Option<usize>) -> Result<(), anyhow::Error> {
    if let Some(num_threads) = num_threads {
        tracing::debug!("using {} threads", num_threads);
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()?;
    }
    Ok(())
}
