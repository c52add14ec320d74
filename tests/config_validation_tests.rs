//! Config Validation Tests
//!
//! Typo detection and range validation for `timp.toml`, exercised
//! independently of the search.

use std::fs;

use timp_triggers::config::validation::{known_config_keys, suggest_correction, validate_unknown_keys};
use timp_triggers::config::{ConfigError, TimpConfig};
use timp_triggers::search::{Execution, SearchGrid};

#[test]
fn typo_in_search_section_warns_with_suggestion() {
    let warnings = validate_unknown_keys("[search]\nend_sm = 30000\n");
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert_eq!(warnings[0].suggestion.as_deref(), Some("search.end_ms"));
}

#[test]
fn typo_in_section_name_warns() {
    let warnings = validate_unknown_keys("[serach]\nstep_ms = 500\n");
    assert!(warnings.iter().any(|w| w.field == "serach"));
    assert!(warnings
        .iter()
        .any(|w| w.suggestion.as_deref() == Some("search")));
}

#[test]
fn unknown_keys_do_not_break_loading() {
    let config = TimpConfig::from_toml_str("[search]\nstep_ms = 2000\nbogus = 1\n").unwrap();
    assert_eq!(config.search.step_ms, 2_000);
}

#[test]
fn every_section_is_known() {
    let known = known_config_keys();
    for section in ["data", "penalty", "search", "output"] {
        assert!(known.contains(section), "missing section {section}");
    }
    assert!(suggest_correction("penalty.fast_outage_cap", &known).is_some());
}

#[test]
fn file_config_drives_grid_and_execution() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timp.toml");
    fs::write(
        &path,
        r#"
[search]
start_ms = 1000
end_ms = 10000
step_ms = 3000
threads = 2
"#,
    )
    .unwrap();

    let config = TimpConfig::load_from_file(&path).unwrap();
    assert_eq!(config.grid(), SearchGrid::new(1_000, 10_000, 3_000));
    assert_eq!(config.grid().values(), vec![1_000.0, 4_000.0, 7_000.0]);
    assert_eq!(config.execution(), Execution::Parallel { threads: 2 });
}

#[test]
fn empty_range_is_rejected_at_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timp.toml");
    fs::write(&path, "[search]\nstart_ms = 5000\nend_ms = 5000\n").unwrap();

    let err = TimpConfig::load_from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
    assert!(err.to_string().contains("search.end_ms"));
}

#[test]
fn parse_error_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[search\n").unwrap();

    let err = TimpConfig::load_from_file(&path).unwrap_err();
    match err {
        ConfigError::Parse(p, _) => assert_eq!(p, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn full_u32_grid_is_rejected_at_load() {
    let config_text = format!("[search]\nstart_ms = 0\nend_ms = {}\nstep_ms = 1\n", u32::MAX);
    let err = TimpConfig::from_toml_str(&config_text).unwrap_err();
    match err {
        ConfigError::Validation(errors) => {
            assert_eq!(errors.len(), 1, "{errors:?}");
            assert!(errors[0].contains("combinations"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
