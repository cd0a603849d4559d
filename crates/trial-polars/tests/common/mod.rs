//! Common test utilities for trial-polars tests

#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use trial_core::{MemoryTable, NamedColumn};

/// Stacked runs in the model's layout: `trials` runs of `steps` steps
pub fn model_runs(trials: usize, steps: usize) -> MemoryTable {
    let mut step = Vec::new();
    let mut iteration = Vec::new();
    let mut severe = Vec::new();
    let mut susceptible = Vec::new();

    for trial in 0..trials {
        for s in 0..steps {
            step.push(s as i64);
            iteration.push(trial as i64);
            // Quarter steps keep every value exact in decimal
            severe.push(((trial + 1) * s) as f64 * 0.25);
            susceptible.push(1000.0 - (s * s) as f64 - trial as f64 * 0.5);
        }
    }

    MemoryTable::from_columns(vec![
        NamedColumn::int("A", vec![1; trials * steps]),
        NamedColumn::int("Step", step),
        NamedColumn::float("Severe", severe),
        NamedColumn::float("Susceptible", susceptible),
        NamedColumn::int("Iteration", iteration),
    ])
    .unwrap()
}

/// Write raw CSV text into `dir`
pub fn write_text(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = File::create(&path).unwrap();
    file.write_all(text.as_bytes()).unwrap();
    path
}

/// First value of a float column
pub fn extract_value(df: &polars::prelude::DataFrame, column: &str, row: usize) -> f64 {
    df.column(column).unwrap().f64().unwrap().get(row).unwrap()
}
