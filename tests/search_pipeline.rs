//! Search Pipeline Integration Test
//!
//! Raw exports -> caches -> DurationStore -> TriggerModel -> brute_force ->
//! SearchReport, the same path the `search` subcommand takes, on a grid
//! small enough to run in milliseconds.

use std::fs;
use std::path::Path;

use timp_triggers::model::{TriggerModel, FAST_OUTAGE_CAP_MS, MAX_DURATION_MS};
use timp_triggers::search::{argmin, brute_force, Execution, SearchGrid};
use timp_triggers::store::{prepare_cache, DurationStore};
use timp_triggers::{SearchError, SearchReport, TimpError};

/// Outage durations (ms) and the stage each one resolved in, assuming
/// escalation every 1000 ms.
const OUTAGES: &[(u32, usize)] = &[
    (150, 0),
    (420, 0),
    (800, 0),
    (990, 0),
    (1_300, 1),
    (1_750, 1),
    (2_400, 2),
    (2_950, 2),
    (3_600, 3),
    (8_000, 3),
    (95_000_000, 3), // above 24h, dropped at ingestion
];

fn write_exports(dir: &Path) {
    let mut all = String::new();
    let mut stages = vec![String::new(); 4];
    for &(ms, stage) in OUTAGES {
        all.push_str(&format!("{ms}\n"));
        stages[stage].push_str(&format!("{ms}\n"));
    }
    fs::write(dir.join("DATA_STALL_all.csv"), all).unwrap();
    for (stage, body) in stages.iter().enumerate() {
        fs::write(dir.join(format!("DATA_STALL_{stage}.csv")), body).unwrap();
    }
}

fn load_store() -> (tempfile::TempDir, DurationStore) {
    let dir = tempfile::tempdir().unwrap();
    write_exports(dir.path());
    prepare_cache(dir.path(), MAX_DURATION_MS).unwrap();
    let store = DurationStore::load_dir(dir.path()).unwrap();
    (dir, store)
}

#[test]
fn prepared_caches_drop_out_of_range_durations() {
    let (_dir, store) = load_store();
    assert_eq!(store.all().len(), 10);
    assert_eq!(store.stages().len(), 4);
    assert_eq!(store.stages()[3].max(), Some(8_000.0));
}

#[test]
fn two_value_grid_same_minimum_sequential_and_parallel() {
    let (_dir, store) = load_store();
    let model = TriggerModel::new(&store, FAST_OUTAGE_CAP_MS).unwrap();
    let grid = SearchGrid::new(0, 2_000, 1_000);

    let seq = brute_force(&model, &grid, Execution::Sequential).unwrap();
    let par = brute_force(&model, &grid, Execution::Parallel { threads: 0 }).unwrap();

    assert_eq!(seq.losses.len(), 8);
    assert_eq!(seq.losses, par.losses);
    assert_eq!(seq.min_index, par.min_index);
    assert_eq!(seq.min_loss.to_bits(), par.min_loss.to_bits());
    assert_eq!(seq.best_thresholds, par.best_thresholds);
}

#[test]
fn reported_minimum_is_global_and_reconstructable() {
    let (_dir, store) = load_store();
    let model = TriggerModel::new(&store, FAST_OUTAGE_CAP_MS).unwrap();
    let grid = SearchGrid::new(0, 4_000, 250);
    let outcome = brute_force(&model, &grid, Execution::Parallel { threads: 3 }).unwrap();

    assert_eq!(outcome.losses.len(), 16 * 16 * 16);
    assert_eq!(argmin(&outcome.losses), Some((outcome.min_index, outcome.min_loss)));

    let n = grid.stride();
    let values = grid.values();
    let i = outcome.min_index;
    let t1 = values[i % n];
    let t3 = values[(i / n) % n];
    let t2 = values[i / (n * n)];
    assert_eq!(outcome.best_thresholds, [t1, t2, t3]);
    assert_eq!(model.loss(t1, t2, t3).unwrap(), outcome.min_loss);
}

#[test]
fn report_persists_full_surface() {
    let (dir, store) = load_store();
    let model = TriggerModel::new(&store, FAST_OUTAGE_CAP_MS).unwrap();
    let grid = SearchGrid::new(0, 3_000, 1_000);
    let outcome = brute_force(&model, &grid, Execution::default()).unwrap();

    let path = dir.path().join("results.json");
    let report = SearchReport::new(outcome.clone(), *model.penalties());
    report.save(&path).unwrap();

    let loaded = SearchReport::load(&path).unwrap();
    assert_eq!(loaded.evaluations, 27);
    assert_eq!(loaded.min_index, outcome.min_index);
    assert_eq!(loaded.best_thresholds, outcome.best_thresholds);
    assert_eq!(loaded.grid, grid);
}

#[test]
fn missing_stage_aborts_whole_search() {
    let dir = tempfile::tempdir().unwrap();
    write_exports(dir.path());
    fs::remove_file(dir.path().join("DATA_STALL_2.csv")).unwrap();
    prepare_cache(dir.path(), MAX_DURATION_MS).unwrap();

    let store = DurationStore::load_dir(dir.path()).unwrap();
    assert_eq!(store.stages().len(), 3);

    let model = TriggerModel::new(&store, FAST_OUTAGE_CAP_MS).unwrap();
    let err = brute_force(&model, &SearchGrid::new(0, 2_000, 1_000), Execution::default()).unwrap_err();
    assert!(matches!(err, SearchError::Model(TimpError::Configuration(_))));
}
