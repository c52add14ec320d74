//! Duration Store
//!
//! Loads the outage durations the cost model runs against and holds them as
//! one immutable context for the whole search.
//!
//! Raw exports are plain text, one duration in milliseconds per line:
//!
//! - `DATA_STALL_all.csv`: every observed outage
//! - `DATA_STALL_<n>.csv`: outages resolved while recovery was in stage `n`
//!
//! `prepare_cache` turns each export into a `<stem>-mod.json` cache next to
//! it, dropping out-of-range values. `DurationStore::load_dir` reads the
//! caches back: the `all-mod.json` file is the full dataset and the rest,
//! in file-name order, are stages 0..N.

use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::model::Durations;

const EXPORT_PREFIX: &str = "DATA_STALL";
const EXPORT_EXTENSION: &str = ".csv";
const CACHE_SUFFIX: &str = "mod.json";
const FULL_CACHE_SUFFIX: &str = "all-mod.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Malformed duration on line {line}: {value:?}")]
    Parse { line: usize, value: String },

    #[error("Cache error ({}): {}", .0.display(), .1)]
    Cache(PathBuf, #[source] serde_json::Error),

    #[error("No full-dataset cache (*all-mod.json) found in {}", .0.display())]
    MissingFullDataset(PathBuf),
}

// ============================================================================
// Context
// ============================================================================

/// Full dataset plus its per-stage partition. Never mutated after load.
#[derive(Debug, Clone, Default)]
pub struct DurationStore {
    all: Durations,
    stages: Vec<Durations>,
}

impl DurationStore {
    pub fn new(all: Vec<u32>, stages: Vec<Vec<u32>>) -> Self {
        Self {
            all: Durations::from_millis(all),
            stages: stages.into_iter().map(Durations::from_millis).collect(),
        }
    }

    pub fn all(&self) -> &Durations {
        &self.all
    }

    pub fn stages(&self) -> &[Durations] {
        &self.stages
    }

    /// Load every cache in `dir` (see module docs for naming).
    pub fn load_dir(dir: &Path) -> Result<Self, StoreError> {
        let mut caches = list_files(dir, |name| name.ends_with(CACHE_SUFFIX))?;
        caches.sort();

        let mut all = None;
        let mut stages = Vec::new();
        for path in caches {
            let values = read_cache(&path)?;
            if path.to_string_lossy().ends_with(FULL_CACHE_SUFFIX) {
                debug!(path = %path.display(), outages = values.len(), "Loaded full dataset");
                all = Some(values);
                continue;
            }
            info!(path = %path.display(), outages = values.len(), "Preparing stage {}", stages.len());
            stages.push(values);
        }

        let all = all.ok_or_else(|| StoreError::MissingFullDataset(dir.to_path_buf()))?;
        let store = Self::new(all, stages);
        store.check_partition();
        Ok(store)
    }

    fn check_partition(&self) {
        let partitioned: usize = self.stages.iter().map(Durations::len).sum();
        if partitioned != self.all.len() {
            warn!(
                full = self.all.len(),
                partitioned,
                "Stage partition size does not match the full dataset"
            );
        }
    }
}

// ============================================================================
// Raw exports
// ============================================================================

/// Parse one duration per line, dropping values above `max_ms`.
pub fn parse_durations<R: Read>(reader: R, max_ms: u32) -> Result<Vec<u32>, StoreError> {
    let mut values = Vec::new();
    for (idx, line) in BufReader::new(reader).lines().enumerate() {
        let line = line.map_err(|e| StoreError::Io(PathBuf::from("<reader>"), e))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value: u32 = trimmed.parse().map_err(|_| StoreError::Parse {
            line: idx + 1,
            value: trimmed.to_string(),
        })?;
        if value <= max_ms {
            values.push(value);
        }
    }
    Ok(values)
}

/// Convert every `DATA_STALL*.csv` export in `dir` into a JSON cache.
pub fn prepare_cache(dir: &Path, max_ms: u32) -> Result<Vec<PathBuf>, StoreError> {
    let mut exports = list_files(dir, |name| {
        name.starts_with(EXPORT_PREFIX) && name.ends_with(EXPORT_EXTENSION)
    })?;
    exports.sort();

    let mut written = Vec::with_capacity(exports.len());
    for export in exports {
        let file = fs::File::open(&export).map_err(|e| StoreError::Io(export.clone(), e))?;
        let values = parse_durations(file, max_ms).map_err(|e| match e {
            StoreError::Io(_, io) => StoreError::Io(export.clone(), io),
            other => other,
        })?;

        let cache = cache_path(&export);
        let json = serde_json::to_vec(&values).map_err(|e| StoreError::Cache(cache.clone(), e))?;
        fs::write(&cache, json).map_err(|e| StoreError::Io(cache.clone(), e))?;
        info!(export = %export.display(), cache = %cache.display(), outages = values.len(), "Cached export");
        written.push(cache);
    }
    Ok(written)
}

/// `DATA_STALL_all.csv` -> `DATA_STALL_all-mod.json`
fn cache_path(export: &Path) -> PathBuf {
    let stem = export
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    export.with_file_name(format!("{stem}-{CACHE_SUFFIX}"))
}

fn read_cache(path: &Path) -> Result<Vec<u32>, StoreError> {
    let bytes = fs::read(path).map_err(|e| StoreError::Io(path.to_path_buf(), e))?;
    serde_json::from_slice(&bytes).map_err(|e| StoreError::Cache(path.to_path_buf(), e))
}

fn list_files(dir: &Path, keep: impl Fn(&str) -> bool) -> Result<Vec<PathBuf>, StoreError> {
    let entries = fs::read_dir(dir).map_err(|e| StoreError::Io(dir.to_path_buf(), e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::Io(dir.to_path_buf(), e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let keep_it = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(&keep);
        if keep_it {
            files.push(path);
        }
    }
    Ok(files)
}
