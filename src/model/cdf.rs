//! Cumulative resolution probability at each stage boundary.

use serde::{Deserialize, Serialize};

use super::durations::Durations;
use super::TRIGGER_COUNT;
use crate::error::{Result, TimpError};

/// `P(duration <= boundary[s])` over the full dataset, for `s` in `0..3`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CdfVector(pub [f64; TRIGGER_COUNT]);

impl CdfVector {
    /// CDF at the end of `stage`, `None` for the terminal stage and beyond.
    pub fn stage(&self, stage: usize) -> Option<f64> {
        self.0.get(stage).copied()
    }

    /// Probability an outage is still unresolved when `stage` ends.
    pub fn survival(&self, stage: usize) -> Option<f64> {
        self.stage(stage).map(|p| 1.0 - p)
    }
}

/// Empirical CDF at the running boundaries `t0`, `t0 + t1`, `t0 + t1 + t2`.
///
/// The denominator is always the full dataset, not a stage partition.
pub fn cdf_for_stages(thresholds: &[f64], full: &Durations) -> Result<CdfVector> {
    if thresholds.len() != TRIGGER_COUNT {
        return Err(TimpError::Configuration(format!(
            "expected {TRIGGER_COUNT} thresholds, got {}",
            thresholds.len()
        )));
    }
    if full.is_empty() {
        return Err(TimpError::EmptyDataset("CDF denominator is zero"));
    }

    let total = full.len() as f64;
    let mut cdf = [0.0; TRIGGER_COUNT];
    let mut end = 0.0;
    for (stage, threshold) in thresholds.iter().enumerate() {
        end += threshold;
        cdf[stage] = full.count_at_most(end) as f64 / total;
    }
    Ok(CdfVector(cdf))
}
