//! TIMP Cost Model for Data-Stall Recovery Triggers
//!
//! Expected total recovery time of a staged recovery procedure as a function
//! of its escalation triggers, estimated from empirical outage durations.
//!
//! ## Architecture
//! - `durations`: sorted duration collections with windowed means and counts
//! - `penalty`: fixed per-stage cost ladder derived from fast outages
//! - `integrator`: conditional mean duration inside a stage's window
//! - `cdf`: cumulative resolution probability at each stage boundary
//! - `overhead`: recursive tail expectation combining the three above
//!
//! `TriggerModel` binds a loaded `DurationStore` to its penalty ladder and
//! exposes the scalar loss the search driver minimizes.

pub mod cdf;
pub mod durations;
pub mod integrator;
pub mod overhead;
pub mod penalty;

pub use cdf::{cdf_for_stages, CdfVector};
pub use durations::{Durations, MAX_DURATION_MS};
pub use integrator::integrate;
pub use overhead::overhead;
pub use penalty::{compute_penalties, compute_penalties_with_cap, Penalties, FAST_OUTAGE_CAP_MS};

use crate::error::Result;
use crate::store::DurationStore;

/// Number of recovery stages, including the terminal one.
pub const STAGE_COUNT: usize = 4;
/// Number of escalation triggers (one fewer than stages).
pub const TRIGGER_COUNT: usize = STAGE_COUNT - 1;
/// Index of the terminal stage, which runs until resolution.
pub const TERMINAL_STAGE: usize = STAGE_COUNT - 1;

/// The loss function over trigger vectors for one loaded dataset.
///
/// Holds only shared references and a copied penalty ladder, so it is
/// `Send + Sync` and every call to [`TriggerModel::loss`] is independent.
#[derive(Debug, Clone, Copy)]
pub struct TriggerModel<'a> {
    store: &'a DurationStore,
    penalties: Penalties,
}

impl<'a> TriggerModel<'a> {
    /// Compute the penalty ladder once and bind it to `store`.
    pub fn new(store: &'a DurationStore, fast_outage_cap_ms: f64) -> Result<Self> {
        let penalties = compute_penalties_with_cap(store.all(), fast_outage_cap_ms)?;
        tracing::info!(
            base_penalty_ms = penalties.base,
            outages = store.all().len(),
            "Penalties prepared"
        );
        Ok(Self { store, penalties })
    }

    /// Bind an explicit penalty ladder.
    pub fn with_penalties(store: &'a DurationStore, penalties: Penalties) -> Self {
        Self { store, penalties }
    }

    pub fn penalties(&self) -> &Penalties {
        &self.penalties
    }

    pub fn store(&self) -> &'a DurationStore {
        self.store
    }

    /// Expected recovery time for any threshold slice.
    pub fn evaluate(&self, thresholds: &[f64]) -> Result<f64> {
        let cdf = cdf_for_stages(thresholds, self.store.all())?;
        overhead(thresholds, &cdf, &self.penalties, self.store.stages(), 0)
    }

    /// Expected recovery time for triggers `(t1, t2, t3)`.
    pub fn loss(&self, t1: f64, t2: f64, t3: f64) -> Result<f64> {
        let thresholds = [t1, t2, t3];
        tracing::trace!(?thresholds, "Evaluating loss");
        self.evaluate(&thresholds)
    }
}
