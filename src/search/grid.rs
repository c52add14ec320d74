//! Discretized trigger space.
//!
//! Each of the three triggers takes the same values `start, start + step, ..`
//! up to (excluding) `end`. Results are laid out with trigger 2 outermost,
//! trigger 3 in the middle and trigger 1 fastest:
//!
//! ```text
//! index = (i2 * n + i3) * n + i1
//! ```

use serde::{Deserialize, Serialize};

/// Default sweep: 0..60s in 1s steps (60 values, 216,000 triples).
pub mod defaults {
    pub const START_MS: u32 = 0;
    pub const END_MS: u32 = 60_000;
    pub const STEP_MS: u32 = 1_000;
}

/// Largest number of triples a single search may evaluate.
pub const MAX_COMBINATIONS: usize = 64_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchGrid {
    pub start_ms: u32,
    pub end_ms: u32,
    pub step_ms: u32,
}

impl Default for SearchGrid {
    fn default() -> Self {
        Self {
            start_ms: defaults::START_MS,
            end_ms: defaults::END_MS,
            step_ms: defaults::STEP_MS,
        }
    }
}

impl SearchGrid {
    pub fn new(start_ms: u32, end_ms: u32, step_ms: u32) -> Self {
        Self { start_ms, end_ms, step_ms }
    }

    /// Values of a single trigger, ascending. Empty for a zero step.
    pub fn values(&self) -> Vec<f64> {
        if self.step_ms == 0 {
            return Vec::new();
        }
        (self.start_ms..self.end_ms)
            .step_by(self.step_ms as usize)
            .map(f64::from)
            .collect()
    }

    /// Values per trigger dimension.
    pub fn stride(&self) -> usize {
        if self.step_ms == 0 || self.end_ms <= self.start_ms {
            return 0;
        }
        (self.end_ms - self.start_ms).div_ceil(self.step_ms) as usize
    }

    /// Total number of trigger triples, `None` if it overflows `usize`.
    pub fn combinations(&self) -> Option<usize> {
        self.stride().checked_pow(3)
    }

    /// Whether the grid is non-empty and within [`MAX_COMBINATIONS`].
    pub fn is_searchable(&self) -> bool {
        self.combinations()
            .is_some_and(|c| c > 0 && c <= MAX_COMBINATIONS)
    }

    /// Map a flat result index back to `[t1, t2, t3]`.
    pub fn triple_at(&self, index: usize) -> Option<[f64; 3]> {
        let n = self.stride();
        if index >= self.combinations()? {
            return None;
        }
        let i1 = index % n;
        let i3 = (index / n) % n;
        let i2 = index / (n * n);
        Some([self.value_at(i1), self.value_at(i2), self.value_at(i3)])
    }

    fn value_at(&self, i: usize) -> f64 {
        f64::from(self.start_ms) + i as f64 * f64::from(self.step_ms)
    }
}
