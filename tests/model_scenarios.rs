//! Cost Model Scenario Tests
//!
//! Exercises the penalty, integration, CDF and overhead operations through
//! the public API on small hand-checkable datasets.

use timp_triggers::model::{cdf_for_stages, integrate, overhead, Durations, Penalties, TriggerModel};
use timp_triggers::{DurationStore, TimpError};

/// Partition `[[], [], [], [5, 15, 25]]` with the full dataset equal to stage 3.
fn terminal_only_store() -> DurationStore {
    DurationStore::new(vec![5, 15, 25], vec![vec![], vec![], vec![], vec![5, 15, 25]])
}

// ============================================================================
// Scenario 1: everything resolves in the terminal stage
// ============================================================================

#[test]
fn terminal_only_partition_walks_recursion_to_exact_value() {
    let store = terminal_only_store();
    let t = [10.0, 10.0, 10.0];
    let penalties = Penalties::from_base(10.0);

    for stage in 0..3 {
        assert_eq!(integrate(&t, stage, store.stages()).unwrap(), 0.0);
    }
    // terminal window is [30, 25]: empty
    assert_eq!(integrate(&t, 3, store.stages()).unwrap(), 0.0);

    let cdf = cdf_for_stages(&t, store.all()).unwrap();
    assert!((cdf.stage(0).unwrap() - 1.0 / 3.0).abs() < 1e-12);
    assert!((cdf.stage(1).unwrap() - 2.0 / 3.0).abs() < 1e-12);
    assert_eq!(cdf.stage(2).unwrap(), 1.0);

    // overhead(3) = 30, overhead(2) = 20, overhead(1) = 10 + 20/3,
    // overhead(0) = (2/3) * (50/3) = 100/9
    let got = overhead(&t, &cdf, &penalties, store.stages(), 0).unwrap();
    assert!((got - 100.0 / 9.0).abs() < 1e-9, "got {got}");

    let model = TriggerModel::with_penalties(&store, penalties);
    assert_eq!(model.loss(10.0, 10.0, 10.0).unwrap(), got);
}

#[test]
fn terminal_stage_mean_when_window_covers_all_data() {
    let store = terminal_only_store();
    let t = [0.0, 0.0, 0.0];
    let penalties = Penalties::from_base(10.0);

    assert_eq!(integrate(&t, 3, store.stages()).unwrap(), 15.0);
    let cdf = cdf_for_stages(&t, store.all()).unwrap();
    assert_eq!(overhead(&t, &cdf, &penalties, store.stages(), 3).unwrap(), 45.0);
    assert_eq!(overhead(&t, &cdf, &penalties, store.stages(), 0).unwrap(), 75.0);
}

// ============================================================================
// Scenario 2: empty dataset
// ============================================================================

#[test]
fn empty_full_dataset_fails_cdf_explicitly() {
    let err = cdf_for_stages(&[1_000.0, 1_000.0, 1_000.0], &Durations::default()).unwrap_err();
    assert!(matches!(err, TimpError::EmptyDataset(_)));
}

#[test]
fn empty_full_dataset_fails_model_construction() {
    let store = DurationStore::new(vec![], vec![vec![], vec![], vec![], vec![]]);
    let err = TriggerModel::new(&store, 60_000.0).unwrap_err();
    assert!(matches!(err, TimpError::EmptyDataset(_)));
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn triggers_beyond_every_duration_leave_no_tail() {
    let durations = vec![1_200, 4_400, 9_000, 17_500, 52_000];
    let store = DurationStore::new(
        durations.clone(),
        vec![durations, vec![70_000], vec![90_000], vec![400_000]],
    );
    let penalties = Penalties::from_base(25_000.0);
    let model = TriggerModel::with_penalties(&store, penalties);

    let got = model.loss(1e9, 1e9, 1e9).unwrap();
    let mean = (1_200.0 + 4_400.0 + 9_000.0 + 17_500.0 + 52_000.0) / 5.0;
    assert!((got - (penalties.stage(0).unwrap() + mean)).abs() < 1e-6, "got {got}");
}

#[test]
fn integrate_stays_within_window() {
    let store = DurationStore::new(
        vec![],
        vec![
            vec![100, 900, 1_500, 2_200],
            vec![2_100, 2_600, 3_900, 7_000],
            vec![4_100, 5_000, 8_800],
            vec![600, 9_000, 12_000, 45_000],
        ],
    );
    let triggers = [0.0, 500.0, 1_000.0, 2_000.0, 3_500.0];
    for &a in &triggers {
        for &b in &triggers {
            for &c in &triggers {
                let t = [a, b, c];
                for stage in 0..4 {
                    let v = integrate(&t, stage, store.stages()).unwrap();
                    if v == 0.0 {
                        continue;
                    }
                    let start: f64 = t[..stage].iter().sum();
                    let end = if stage == 3 {
                        store.stages()[3].max().unwrap()
                    } else {
                        start + t[stage]
                    };
                    assert!(
                        v >= start && v <= end,
                        "stage {stage} t={t:?}: {v} outside [{start}, {end}]"
                    );
                }
            }
        }
    }
}

#[test]
fn loss_is_idempotent() {
    let store = DurationStore::new(
        vec![700, 2_000, 5_500, 31_000, 64_000, 250_000],
        vec![vec![700, 2_000], vec![5_500], vec![31_000, 64_000], vec![250_000]],
    );
    let model = TriggerModel::new(&store, 60_000.0).unwrap();
    let first = model.loss(4_000.0, 12_000.0, 40_000.0).unwrap();
    for _ in 0..10 {
        assert_eq!(model.loss(4_000.0, 12_000.0, 40_000.0).unwrap().to_bits(), first.to_bits());
    }
}
