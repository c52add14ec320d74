//! Config validation: unknown-key detection with Levenshtein suggestions
//! and range checks.
//!
//! The raw TOML is walked first and every key compared against the known
//! field names; unknown keys produce warnings with "did you mean?"
//! suggestions and never break a config. Range checks run after serde
//! deserialization and return hard errors.

use std::collections::HashSet;

use std::fmt;

use super::TimpConfig;
use crate::search::MAX_COMBINATIONS;

/// An unknown key found in a config file.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub suggestion: Option<String>,
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.suggestion {
            Some(s) => write!(f, "Unknown config key '{}' (did you mean '{s}'?)", self.field),
            None => write!(f, "Unknown config key '{}'", self.field),
        }
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Every valid dotted key path of `TimpConfig`.
///
/// Must be kept in sync with the structs in `config/mod.rs`.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [data]
        "data",
        "data.dir",
        "data.max_duration_ms",
        // [penalty]
        "penalty",
        "penalty.fast_outage_cap_ms",
        // [search]
        "search",
        "search.start_ms",
        "search.end_ms",
        "search.step_ms",
        "search.threads",
        "search.sequential",
        // [output]
        "output",
        "output.results_path",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Every dotted key path in a parsed TOML document, in no particular order.
///
/// `[search]\nstep_ms = 1` yields `search` and `search.step_ms`.
pub fn walk_toml_keys(value: &toml::Value) -> Vec<String> {
    let mut keys = Vec::new();
    let mut pending = vec![(String::new(), value)];
    while let Some((prefix, value)) = pending.pop() {
        let Some(table) = value.as_table() else {
            continue;
        };
        for (key, child) in table {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            keys.push(path.clone());
            pending.push((path, child));
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Closest known key within edit distance 3. Ties resolve alphabetically.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (levenshtein(unknown, k), k))
        .filter(|&(dist, _)| dist <= 3)
        .min()
        .map(|(_, k)| k.to_string())
}

// ============================================================================
// Entry points
// ============================================================================

/// Warnings for every unknown key in `raw_toml`. Parse errors are left to serde.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        return Vec::new();
    };

    let known = known_config_keys();
    walk_toml_keys(&value)
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            field: key,
        })
        .collect()
}

/// Hard errors for values the search cannot run with.
pub fn validate_ranges(config: &TimpConfig) -> Vec<String> {
    let mut errors = Vec::new();
    let s = &config.search;

    if s.step_ms == 0 {
        errors.push("search.step_ms must be > 0".to_string());
    }
    if s.end_ms <= s.start_ms {
        errors.push(format!(
            "search.end_ms ({}) must be greater than search.start_ms ({})",
            s.end_ms, s.start_ms
        ));
    }
    if s.step_ms > 0 && s.end_ms > s.start_ms && !config.grid().is_searchable() {
        errors.push(format!(
            "search grid [{}, {}) step {} has {} values per trigger; \
             at most {MAX_COMBINATIONS} combinations are allowed",
            s.start_ms,
            s.end_ms,
            s.step_ms,
            config.grid().stride()
        ));
    }

    let cap = config.penalty.fast_outage_cap_ms;
    if !cap.is_finite() || cap <= 0.0 {
        errors.push(format!(
            "penalty.fast_outage_cap_ms = {cap} must be finite and > 0"
        ));
    }

    if config.data.max_duration_ms == 0 {
        errors.push("data.max_duration_ms must be > 0".to_string());
    }

    errors
}
