//! TIMP: Data-Stall Recovery Trigger Estimation
//!
//! Estimates, from empirical outage durations, the escalation triggers of a
//! four-stage data-stall recovery procedure that minimize expected total
//! recovery time.
//!
//! ## Architecture
//!
//! - **Duration Store** (`store`): loads the full dataset and its per-stage
//!   partition into one immutable context
//! - **Cost Model** (`model`): penalties, stage integration, CDF and the
//!   recursive expected-overhead loss
//! - **Search Driver** (`search`): exhaustive parallel sweep of the
//!   discretized trigger space
//! - **Report** (`report`): persists the loss surface and its minimum

pub mod config;
pub mod error;
pub mod model;
pub mod report;
pub mod search;
pub mod store;

pub use config::TimpConfig;
pub use error::TimpError;
pub use model::{
    cdf_for_stages, compute_penalties, integrate, overhead, CdfVector, Durations, Penalties,
    TriggerModel, STAGE_COUNT, TRIGGER_COUNT,
};
pub use report::{ReportError, SearchReport};
pub use search::{brute_force, Execution, SearchError, SearchGrid, SearchOutcome};
pub use store::{DurationStore, StoreError};
