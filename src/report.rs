//! Search report persistence.
//!
//! The full loss surface is kept alongside the minimum so it can be plotted
//! or re-ranked later without re-running the search.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::model::Penalties;
use crate::search::{SearchGrid, SearchOutcome};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    pub generated_at: DateTime<Utc>,
    pub grid: SearchGrid,
    pub penalties: Penalties,
    pub evaluations: usize,
    pub min_loss: f64,
    pub min_index: usize,
    /// `[t1, t2, t3]` in milliseconds.
    pub best_thresholds: [f64; 3],
    /// Expected recovery time per triple, trigger 1 varying fastest.
    pub losses: Vec<f64>,
}

impl SearchReport {
    pub fn new(outcome: SearchOutcome, penalties: Penalties) -> Self {
        Self {
            generated_at: Utc::now(),
            grid: outcome.grid,
            penalties,
            evaluations: outcome.losses.len(),
            min_loss: outcome.min_loss,
            min_index: outcome.min_index,
            best_thresholds: outcome.best_thresholds,
            losses: outcome.losses,
        }
    }

    /// Write pretty JSON via a sibling temp file and rename.
    pub fn save(&self, path: &Path) -> Result<(), ReportError> {
        let json = serde_json::to_vec_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| ReportError::Io(tmp.clone(), e))?;
        fs::rename(&tmp, path).map_err(|e| ReportError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), evaluations = self.evaluations, "Search report saved");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let bytes = fs::read(path).map_err(|e| ReportError::Io(path.to_path_buf(), e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
