//! Per-stage recovery penalties.
//!
//! The base penalty is the mean of the "fast" outages (those that resolve
//! within the cap, 60s by default). Stage `s` costs `s * base`, so stage 0
//! is free and each escalation costs one more base unit.

use serde::{Deserialize, Serialize};

use super::durations::{mean, Durations};
use super::STAGE_COUNT;
use crate::error::{Result, TimpError};

/// Default cap (ms) on outages used to estimate the base penalty.
pub const FAST_OUTAGE_CAP_MS: f64 = 60_000.0;

/// Fixed cost of invoking each recovery stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Penalties {
    pub base: f64,
    pub per_stage: [f64; STAGE_COUNT],
}

impl Penalties {
    /// Linear penalty ladder `[0, base, 2*base, 3*base]`.
    pub fn from_base(base: f64) -> Self {
        let mut per_stage = [0.0; STAGE_COUNT];
        for (stage, penalty) in per_stage.iter_mut().enumerate() {
            *penalty = stage as f64 * base;
        }
        Self { base, per_stage }
    }

    /// Penalty of `stage`, `None` past the terminal stage.
    pub fn stage(&self, stage: usize) -> Option<f64> {
        self.per_stage.get(stage).copied()
    }
}

/// Derive the penalty ladder from the full dataset using the default cap.
pub fn compute_penalties(full: &Durations) -> Result<Penalties> {
    compute_penalties_with_cap(full, FAST_OUTAGE_CAP_MS)
}

/// Derive the penalty ladder, averaging durations `<= cap_ms`.
pub fn compute_penalties_with_cap(full: &Durations, cap_ms: f64) -> Result<Penalties> {
    if full.is_empty() {
        return Err(TimpError::EmptyDataset("full dataset is empty"));
    }
    let fast = full.window(0.0, cap_ms);
    let base = mean(fast).ok_or(TimpError::EmptyDataset(
        "no outage resolved within the fast-outage cap",
    ))?;
    Ok(Penalties::from_base(base))
}
