//! TIMP trigger search
//!
//! Finds the data-stall recovery triggers that minimize expected recovery
//! time over the full discretized trigger space.
//!
//! # Usage
//!
//! ```bash
//! # Convert DATA_STALL*.csv exports into caches
//! timp-triggers prepare --data-dir ./stalls
//!
//! # Run the exhaustive search and write results.json
//! timp-triggers search --data-dir ./stalls
//! ```
//!
//! # Environment Variables
//!
//! - `TIMP_CONFIG`: Path to a TOML config (default: ./timp.toml)
//! - `RUST_LOG`: Logging level (default: info)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use timp_triggers::model::TriggerModel;
use timp_triggers::report::SearchReport;
use timp_triggers::search::{self, Execution};
use timp_triggers::store::{self, DurationStore};
use timp_triggers::TimpConfig;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "timp-triggers")]
#[command(about = "Data-stall recovery trigger estimation")]
#[command(version)]
struct CliArgs {
    /// Path to a TOML config file (overrides TIMP_CONFIG and ./timp.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert DATA_STALL*.csv exports into duration caches
    Prepare {
        /// Directory holding the exports (default: config data.dir)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Evaluate every trigger triple and report the global minimum
    Search {
        /// Directory holding the caches (default: config data.dir)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Where to write the report (default: config output.results_path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Worker threads, 0 = one per core
        #[arg(long, env = "TIMP_THREADS")]
        threads: Option<usize>,

        /// Evaluate on a single thread
        #[arg(long)]
        sequential: bool,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<TimpConfig> {
    match path {
        Some(p) => TimpConfig::load_from_file(p)
            .with_context(|| format!("loading config {}", p.display())),
        None => Ok(TimpConfig::load()),
    }
}

fn prepare(config: &TimpConfig, data_dir: Option<PathBuf>) -> Result<()> {
    let dir = data_dir.unwrap_or_else(|| config.data.dir.clone());
    info!(dir = %dir.display(), "Preparing duration caches");
    let written = store::prepare_cache(&dir, config.data.max_duration_ms)
        .with_context(|| format!("preparing caches in {}", dir.display()))?;
    info!(caches = written.len(), "End data preparations");
    Ok(())
}

fn run_search(
    config: &TimpConfig,
    data_dir: Option<PathBuf>,
    output: Option<PathBuf>,
    threads: Option<usize>,
    sequential: bool,
) -> Result<()> {
    let dir = data_dir.unwrap_or_else(|| config.data.dir.clone());
    let output = output.unwrap_or_else(|| config.output.results_path.clone());

    let execution = if sequential {
        Execution::Sequential
    } else if let Some(threads) = threads {
        Execution::Parallel { threads }
    } else {
        config.execution()
    };

    let store = DurationStore::load_dir(&dir)
        .with_context(|| format!("loading duration caches from {}", dir.display()))?;
    info!("Preparing penalties...");
    let model = TriggerModel::new(&store, config.penalty.fast_outage_cap_ms)
        .context("estimating recovery penalties")?;

    let outcome = search::brute_force(&model, &config.grid(), execution)
        .context("trigger search aborted")?;

    let [t1, t2, t3] = outcome.best_thresholds;
    info!(
        min_loss_ms = outcome.min_loss,
        min_index = outcome.min_index,
        trigger1_ms = t1,
        trigger2_ms = t2,
        trigger3_ms = t3,
        "Global minimum"
    );

    SearchReport::new(outcome, *model.penalties())
        .save(&output)
        .with_context(|| format!("writing report {}", output.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let config = load_config(args.config.as_ref())?;

    match args.command {
        Command::Prepare { data_dir } => prepare(&config, data_dir),
        Command::Search {
            data_dir,
            output,
            threads,
            sequential,
        } => run_search(&config, data_dir, output, threads, sequential),
    }
}
