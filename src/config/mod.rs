//! Run Configuration
//!
//! Search and data settings loaded from TOML.
//!
//! ## Loading Order
//!
//! 1. `TIMP_CONFIG` environment variable (path to TOML file)
//! 2. `timp.toml` in the current working directory
//! 3. Built-in defaults (60 values per trigger, 1s step, 60s fast-outage cap)
//!
//! The loaded config is passed down explicitly; there is no global instance.

pub mod validation;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::model::{FAST_OUTAGE_CAP_MS, MAX_DURATION_MS};
use crate::search::grid::{defaults as grid_defaults, SearchGrid};
use crate::search::Execution;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "TIMP_CONFIG";
/// Config file picked up from the working directory.
pub const LOCAL_CONFIG: &str = "timp.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

// ============================================================================
// Top-Level Config
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimpConfig {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub penalty: PenaltyConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl TimpConfig {
    /// Load using the standard search order, falling back to defaults.
    pub fn load() -> Self {
        let mut candidates = Vec::new();
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            candidates.push(PathBuf::from(path));
        }
        let local = PathBuf::from(LOCAL_CONFIG);
        if local.is_file() {
            candidates.push(local);
        }

        for path in candidates {
            match Self::load_from_file(&path) {
                Ok(config) => {
                    info!(path = %path.display(), "Loaded config");
                    return config;
                }
                Err(e) => warn!(error = %e, "Skipping config file"),
            }
        }

        info!("No usable config file, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file. Unknown keys warn, bad values fail.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, err) => ConfigError::Parse(path.to_path_buf(), err),
            other => other,
        })
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for warning in validation::validate_unknown_keys(contents) {
            warn!(field = %warning.field, "{warning}");
        }
        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::from("<inline>"), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the search cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let errors = validation::validate_ranges(self);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    pub fn grid(&self) -> SearchGrid {
        SearchGrid::new(self.search.start_ms, self.search.end_ms, self.search.step_ms)
    }

    pub fn execution(&self) -> Execution {
        if self.search.sequential {
            Execution::Sequential
        } else {
            Execution::Parallel { threads: self.search.threads }
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Where the duration caches live and what counts as a valid duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,

    /// Durations above this (ms) are dropped at ingestion.
    #[serde(default = "default_max_duration_ms")]
    pub max_duration_ms: u32,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_max_duration_ms() -> u32 {
    MAX_DURATION_MS
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            max_duration_ms: default_max_duration_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyConfig {
    /// Outages at or under this (ms) estimate the base penalty.
    #[serde(default = "default_fast_outage_cap_ms")]
    pub fast_outage_cap_ms: f64,
}

fn default_fast_outage_cap_ms() -> f64 {
    FAST_OUTAGE_CAP_MS
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        Self {
            fast_outage_cap_ms: default_fast_outage_cap_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_start_ms")]
    pub start_ms: u32,

    /// Exclusive.
    #[serde(default = "default_end_ms")]
    pub end_ms: u32,

    #[serde(default = "default_step_ms")]
    pub step_ms: u32,

    /// Worker threads; 0 = one per available core.
    #[serde(default)]
    pub threads: usize,

    /// Evaluate on the calling thread only.
    #[serde(default)]
    pub sequential: bool,
}

fn default_start_ms() -> u32 {
    grid_defaults::START_MS
}
fn default_end_ms() -> u32 {
    grid_defaults::END_MS
}
fn default_step_ms() -> u32 {
    grid_defaults::STEP_MS
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            start_ms: default_start_ms(),
            end_ms: default_end_ms(),
            step_ms: default_step_ms(),
            threads: 0,
            sequential: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_results_path")]
    pub results_path: PathBuf,
}

fn default_results_path() -> PathBuf {
    PathBuf::from("results.json")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_path: default_results_path(),
        }
    }
}
