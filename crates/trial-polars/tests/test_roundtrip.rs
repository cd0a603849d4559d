//! File round trips through polars

mod common;

use approx::assert_relative_eq;
use common::{extract_value, model_runs};
use trial_aggregate::{AggregationConfig, Aggregator, MovingWindow, ShapeHint};
use trial_core::{simulation_schema, MemoryTable, TableSource};
use trial_polars::{
    columns_to_frame, read_ipc, read_trial_csv, series_to_frame, write_csv, write_ipc,
    FrameSink, FrameSource, TrialStatsExt,
};

fn aggregator() -> Aggregator {
    Aggregator::new(AggregationConfig::new(0.95, MovingWindow::new(2, 3))).unwrap()
}

fn csv_copy(table: &MemoryTable, dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("runs.csv");
    let mut df = columns_to_frame(table.columns()).unwrap();
    write_csv(&path, &mut df).unwrap();
    path
}

#[test]
fn test_csv_matches_memory_table() {
    let dir = tempfile::tempdir().unwrap();
    let table = model_runs(4, 12);
    let path = csv_copy(&table, dir.path());

    let df = read_trial_csv(&path, &simulation_schema()).unwrap();
    let source = FrameSource::new(&df);
    assert_eq!(source.row_count(), table.row_count());

    let hint = ShapeHint::exact(4, 12);
    let columns = ["Severe", "Susceptible"];
    let from_memory = aggregator().aggregate_columns(&table, "Step", &columns, hint).unwrap();
    let from_csv = aggregator().aggregate_columns(&source, "Step", &columns, hint).unwrap();

    for ((name_a, a), (name_b, b)) in from_memory.iter().zip(&from_csv) {
        assert_eq!(name_a, name_b);
        for (x, y) in a.iter().zip(b) {
            assert_eq!(x.count, y.count);
            assert_relative_eq!(x.mean, y.mean, epsilon = 1e-12);
            assert_relative_eq!(x.moving_average, y.moving_average, epsilon = 1e-12);
            assert_relative_eq!(x.lower_bound(), y.lower_bound(), epsilon = 1e-9);
            assert_relative_eq!(x.upper_bound(), y.upper_bound(), epsilon = 1e-9);
        }
    }
}

#[test]
fn test_integer_valued_float_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_text(
        dir.path(),
        "runs.csv",
        "Step,Deceased\n0,0\n1,2\n0,0\n1,4\n",
    );

    let df = read_trial_csv(&path, &simulation_schema()).unwrap();
    let series = df
        .trial_aggregate_series(&aggregator(), "Step", &["Deceased"], ShapeHint::default())
        .unwrap();
    assert_eq!(series[0].1.means(), vec![0.0, 3.0]);
}

#[test]
fn test_ipc_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let table = model_runs(3, 5);
    let series = aggregator()
        .aggregate_source(&table, "Step", "Severe", ShapeHint::default())
        .unwrap();

    let mut df = series_to_frame(&series).unwrap();
    let path = dir.path().join("Severe.arrow");
    write_ipc(&path, &mut df).unwrap();

    let back = read_ipc(&path).unwrap();
    assert!(back.equals(&df));
    for (i, step) in series.iter().enumerate() {
        assert_eq!(extract_value(&back, "average", i), step.mean);
        assert_eq!(extract_value(&back, "dayAverage", i), step.moving_average);
    }
}

#[test]
fn test_frame_sink_matches_series_frame() {
    let table = model_runs(3, 5);
    let series = aggregator()
        .aggregate_source(&table, "Step", "Susceptible", ShapeHint::default())
        .unwrap();

    let mut sink = FrameSink::new();
    series.write_to(&mut sink).unwrap();
    assert!(sink.into_frame().unwrap().equals(&series_to_frame(&series).unwrap()));
}
