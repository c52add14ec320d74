//! Synthetic Data-Stall Durations
//!
//! Generates outage-duration exports in the layout `timp-triggers prepare`
//! expects, for exercising the search without field data:
//!
//! - `DATA_STALL_all.csv`: every outage
//! - `DATA_STALL_{0..3}.csv`: outages by the recovery stage active when they
//!   resolved, under uniform escalation triggers of `--trigger-ms`
//!
//! Durations are a mixture of two log-normals: short stalls that clear on
//! their own and long ones that need escalation.
//!
//! # Usage
//! ```bash
//! ./synth-stalls --count 50000 --seed 7 --out ./stalls
//! ./timp-triggers prepare --data-dir ./stalls
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use rand::prelude::*;
use rand_distr::{Distribution, LogNormal};
use tracing::info;

use timp_triggers::STAGE_COUNT;

// ============================================================================
// Distribution Constants
// ============================================================================

/// Median of short stalls (ms)
const FAST_MEDIAN_MS: f64 = 8_000.0;
/// Log-space spread of short stalls
const FAST_SIGMA: f64 = 0.8;
/// Median of long stalls (ms)
const SLOW_MEDIAN_MS: f64 = 240_000.0;
/// Log-space spread of long stalls
const SLOW_SIGMA: f64 = 1.2;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "synth-stalls")]
#[command(about = "Synthetic data-stall duration exports for timp-triggers")]
#[command(version)]
struct Args {
    /// Number of outages to generate
    #[arg(short, long, default_value = "20000")]
    count: usize,

    /// Share of outages drawn from the short-stall component (0-1)
    #[arg(long, default_value = "0.7")]
    fast_share: f64,

    /// Escalation trigger (ms) used to assign outages to stages
    #[arg(long, default_value = "60000")]
    trigger_ms: u32,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,
}

/// Stage active when an outage of `duration_ms` resolves.
fn resolving_stage(duration_ms: u32, trigger_ms: u32) -> usize {
    let mut boundary = 0u64;
    for stage in 0..STAGE_COUNT - 1 {
        boundary += u64::from(trigger_ms);
        if u64::from(duration_ms) <= boundary {
            return stage;
        }
    }
    STAGE_COUNT - 1
}

fn write_export(path: &Path, values: &[u32]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for v in values {
        writeln!(out, "{v}")?;
    }
    out.flush()?;
    info!(path = %path.display(), outages = values.len(), "Wrote export");
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

    let args = Args::parse();
    anyhow::ensure!(
        (0.0..=1.0).contains(&args.fast_share),
        "--fast-share must be within 0-1, got {}",
        args.fast_share
    );
    anyhow::ensure!(args.trigger_ms > 0, "--trigger-ms must be > 0");

    let mut rng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let fast = LogNormal::new(FAST_MEDIAN_MS.ln(), FAST_SIGMA)?;
    let slow = LogNormal::new(SLOW_MEDIAN_MS.ln(), SLOW_SIGMA)?;

    let mut all = Vec::with_capacity(args.count);
    let mut stages: Vec<Vec<u32>> = vec![Vec::new(); STAGE_COUNT];
    for _ in 0..args.count {
        let sample = if rng.gen_bool(args.fast_share) {
            fast.sample(&mut rng)
        } else {
            slow.sample(&mut rng)
        };
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let duration = sample.round().clamp(0.0, f64::from(u32::MAX)) as u32;
        all.push(duration);
        stages[resolving_stage(duration, args.trigger_ms)].push(duration);
    }

    fs::create_dir_all(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;
    write_export(&args.out.join("DATA_STALL_all.csv"), &all)?;
    for (stage, values) in stages.iter().enumerate() {
        write_export(&args.out.join(format!("DATA_STALL_{stage}.csv")), values)?;
    }

    info!(
        outages = all.len(),
        seed = ?args.seed,
        trigger_ms = args.trigger_ms,
        "Synthetic dataset complete"
    );
    Ok(())
}
