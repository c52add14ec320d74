//! Stage integrator: conditional mean duration inside a stage's window.
//!
//! Stage `s` covers `[sum(t[..s]), sum(t[..=s])]`. The terminal stage has
//! no trigger of its own, so its window runs to the largest duration
//! observed in that stage.

use super::durations::Durations;
use super::{STAGE_COUNT, TRIGGER_COUNT, TERMINAL_STAGE};
use crate::error::{Result, TimpError};

/// Window `[start, end]` of `stage`. `None` for an empty terminal stage or
/// when `thresholds` is too short to place the stage.
pub fn stage_window(thresholds: &[f64], stage: usize, stage_durations: &Durations) -> Option<(f64, f64)> {
    let start: f64 = thresholds.get(..stage)?.iter().sum();
    if stage == TERMINAL_STAGE {
        return stage_durations.max().map(|max| (start, max));
    }
    Some((start, start + thresholds.get(stage)?))
}

/// Mean duration of outages resolved in `stage` whose duration falls inside
/// the stage's window. An empty window contributes exactly 0.
pub fn integrate(thresholds: &[f64], stage: usize, partition: &[Durations]) -> Result<f64> {
    if thresholds.len() != TRIGGER_COUNT {
        return Err(TimpError::Configuration(format!(
            "expected {TRIGGER_COUNT} thresholds, got {}",
            thresholds.len()
        )));
    }
    if stage >= STAGE_COUNT || stage >= partition.len() {
        return Err(TimpError::Configuration(format!(
            "stage {stage} outside partition of {} stages",
            partition.len()
        )));
    }

    let stage_durations = &partition[stage];
    let Some((start, end)) = stage_window(thresholds, stage, stage_durations) else {
        return Ok(0.0);
    };
    Ok(stage_durations.window_mean(start, end).unwrap_or(0.0))
}
