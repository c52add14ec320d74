//! Exhaustive Trigger Search
//!
//! Evaluates the loss at every point of a [`SearchGrid`] and reports the
//! global minimum.
//!
//! Triggers 2 and 3 are swept sequentially on the calling thread; each
//! `(t2, t3)` pair becomes one batch in which every trigger-1 value is
//! evaluated on a rayon pool. `collect` keeps submission order, so the flat
//! loss sequence is the same whichever execution strategy produced it.
//!
//! The first failed evaluation aborts the whole search.

pub mod grid;

pub use grid::{SearchGrid, MAX_COMBINATIONS};

use rayon::prelude::*;
use rayon::ThreadPool;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::error::TimpError;
use crate::model::TriggerModel;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Evaluation failed: {0}")]
    Model(#[from] TimpError),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Search grid is empty: {0:?}")]
    EmptyGrid(SearchGrid),

    #[error("Search grid {0:?} exceeds {max} combinations", max = MAX_COMBINATIONS)]
    GridTooLarge(SearchGrid),
}

/// How the innermost trigger dimension is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Execution {
    /// Worker pool with `threads` workers (0 = one per available core).
    Parallel { threads: usize },
    /// Everything on the calling thread.
    Sequential,
}

impl Default for Execution {
    fn default() -> Self {
        Self::Parallel { threads: 0 }
    }
}

/// Every loss in search order plus the located minimum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub grid: SearchGrid,
    pub losses: Vec<f64>,
    pub min_index: usize,
    pub min_loss: f64,
    /// `[t1, t2, t3]` at `min_index`.
    pub best_thresholds: [f64; 3],
}

/// Evaluate the whole grid and locate the global minimum.
pub fn brute_force(
    model: &TriggerModel<'_>,
    grid: &SearchGrid,
    execution: Execution,
) -> Result<SearchOutcome, SearchError> {
    let combinations = match grid.combinations() {
        Some(0) => return Err(SearchError::EmptyGrid(*grid)),
        Some(c) if c <= MAX_COMBINATIONS => c,
        _ => return Err(SearchError::GridTooLarge(*grid)),
    };
    let values = grid.values();

    let pool = match execution {
        Execution::Parallel { threads } => Some(
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("timp-worker-{i}"))
                .build()?,
        ),
        Execution::Sequential => None,
    };
    info!(
        stride = values.len(),
        combinations,
        workers = pool.as_ref().map_or(1, ThreadPool::current_num_threads),
        "Starting trigger search"
    );

    let n = values.len();
    let mut losses = Vec::with_capacity(combinations);
    for (i2, &t2) in values.iter().enumerate() {
        for &t3 in &values {
            let batch = evaluate_batch(model, pool.as_ref(), &values, t2, t3)?;
            debug!(t2, t3, "Batch complete");
            losses.extend(batch);
        }
        info!(threshold2_ms = t2, done = i2 + 1, of = n, "Trigger sweep progress");
    }

    let (min_index, min_loss) = argmin(&losses).ok_or(SearchError::EmptyGrid(*grid))?;
    let best_thresholds = grid
        .triple_at(min_index)
        .ok_or(SearchError::EmptyGrid(*grid))?;
    info!(min_loss, min_index, ?best_thresholds, "Search complete");

    Ok(SearchOutcome {
        grid: *grid,
        losses,
        min_index,
        min_loss,
        best_thresholds,
    })
}

/// One `(t2, t3)` batch, trigger 1 varying, in trigger-1 order.
fn evaluate_batch(
    model: &TriggerModel<'_>,
    pool: Option<&ThreadPool>,
    t1_values: &[f64],
    t2: f64,
    t3: f64,
) -> Result<Vec<f64>, TimpError> {
    match pool {
        Some(pool) => pool.install(|| {
            t1_values
                .par_iter()
                .map(|&t1| model.loss(t1, t2, t3))
                .collect()
        }),
        None => t1_values.iter().map(|&t1| model.loss(t1, t2, t3)).collect(),
    }
}

/// Index and value of the first minimum.
pub fn argmin(losses: &[f64]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &loss) in losses.iter().enumerate() {
        match best {
            Some((_, current)) if loss >= current => {}
            _ if loss.is_nan() => {}
            _ => best = Some((idx, loss)),
        }
    }
    best
}
