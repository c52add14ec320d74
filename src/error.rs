//! Error taxonomy for the trigger model.
//!
//! Both variants are fatal: the search driver aborts on the first one and
//! surfaces it to the caller with no partial output.

use thiserror::Error;

/// Errors raised by the cost model and the search driver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimpError {
    /// An average or a CDF denominator was requested over an empty collection.
    #[error("Empty dataset: {0}")]
    EmptyDataset(&'static str),

    /// Threshold vector or stage partition does not have the 3-trigger / 4-stage shape.
    #[error("Insufficient threshold/stage configuration: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, TimpError>;
