//! Expected recovery overhead as a recursive tail expectation.
//!
//! ```text
//! overhead(3) = penalty[3] + integrate(3)
//! overhead(s) = penalty[s] + integrate(s) + (1 - cdf[s]) * overhead(s + 1)
//! ```
//!
//! Evaluated as a fold from the terminal stage back to stage 0, which is the
//! same accumulation order as the recursion.

use super::cdf::CdfVector;
use super::durations::Durations;
use super::integrator::integrate;
use super::penalty::Penalties;
use super::{STAGE_COUNT, TERMINAL_STAGE, TRIGGER_COUNT};
use crate::error::{Result, TimpError};

/// Expected total recovery time starting in `stage` (entry point: 0).
pub fn overhead(
    thresholds: &[f64],
    cdf: &CdfVector,
    penalties: &Penalties,
    partition: &[Durations],
    stage: usize,
) -> Result<f64> {
    if thresholds.len() != TRIGGER_COUNT || partition.len() != STAGE_COUNT {
        return Err(TimpError::Configuration(format!(
            "need {TRIGGER_COUNT} thresholds and {STAGE_COUNT} stages, got {} and {}",
            thresholds.len(),
            partition.len()
        )));
    }
    if stage > TERMINAL_STAGE {
        return Err(TimpError::Configuration(format!(
            "stage {stage} is past the terminal stage {TERMINAL_STAGE}"
        )));
    }

    let mut tail = penalty_of(penalties, TERMINAL_STAGE)? + integrate(thresholds, TERMINAL_STAGE, partition)?;
    for s in (stage..TERMINAL_STAGE).rev() {
        let survival = cdf.survival(s).ok_or_else(|| {
            TimpError::Configuration(format!("no CDF entry for stage {s}"))
        })?;
        tail = penalty_of(penalties, s)? + integrate(thresholds, s, partition)? + survival * tail;
    }
    Ok(tail)
}

fn penalty_of(penalties: &Penalties, stage: usize) -> Result<f64> {
    penalties
        .stage(stage)
        .ok_or_else(|| TimpError::Configuration(format!("no penalty for stage {stage}")))
}
