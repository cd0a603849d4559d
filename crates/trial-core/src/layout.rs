//! Trial layout and the validated trial matrix
//!
//! Simulation output is stored trial-major: every trial contributes one
//! record per step, contiguously, and all trials share the same step count.
//! [`TrialMatrix`] is the only way records reach the aggregator, so every
//! rectangularity check lives here and runs before any statistic is computed.

use crate::table::TableSource;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Shape of a rectangular trial table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrialLayout {
    trial_count: usize,
    step_count: usize,
}

impl TrialLayout {
    /// Create a layout; both dimensions must be positive
    pub fn new(trial_count: usize, step_count: usize) -> Result<Self> {
        if trial_count == 0 {
            return Err(Error::InvalidConfiguration(
                "trial count must be positive".to_string(),
            ));
        }
        if step_count == 0 {
            return Err(Error::InvalidConfiguration(
                "step count must be positive".to_string(),
            ));
        }
        Ok(Self {
            trial_count,
            step_count,
        })
    }

    pub fn trial_count(&self) -> usize {
        self.trial_count
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Total number of records, `trial_count * step_count`
    pub fn record_count(&self) -> usize {
        self.trial_count * self.step_count
    }

    /// Flat index of a (trial, step) record
    pub fn index(&self, trial: usize, step: usize) -> usize {
        trial * self.step_count + step
    }

    /// (trial, step) position of a flat record index
    pub fn position(&self, index: usize) -> (usize, usize) {
        (index / self.step_count, index % self.step_count)
    }
}

/// Optional shape declared by the caller
///
/// Missing dimensions are inferred from the data: the step count from the
/// largest step value, the trial count from the number of step runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeHint {
    pub trial_count: Option<usize>,
    pub step_count: Option<usize>,
}

impl ShapeHint {
    pub fn exact(trial_count: usize, step_count: usize) -> Self {
        Self {
            trial_count: Some(trial_count),
            step_count: Some(step_count),
        }
    }

    pub fn steps(step_count: usize) -> Self {
        Self {
            trial_count: None,
            step_count: Some(step_count),
        }
    }
}

/// Rectangular, finite record set for one tracked quantity
#[derive(Debug, Clone, PartialEq)]
pub struct TrialMatrix {
    layout: TrialLayout,
    values: Vec<f64>,
}

impl TrialMatrix {
    /// Build from records already laid out trial-major
    ///
    /// The record count must equal `layout.record_count()`. The reported
    /// position of a short table is the first missing record; of a long one,
    /// the first record past the declared layout.
    pub fn from_contiguous(values: Vec<f64>, layout: TrialLayout) -> Result<Self> {
        let expected = layout.record_count();
        if values.len() < expected {
            let (trial, step) = layout.position(values.len());
            return Err(Error::malformed(
                trial,
                step,
                format!("missing record: got {} records, expected {expected}", values.len()),
            ));
        }
        if values.len() > expected {
            let (trial, step) = layout.position(expected);
            return Err(Error::malformed(
                trial,
                step,
                format!(
                    "record beyond declared layout: got {} records, expected {expected}",
                    values.len()
                ),
            ));
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            let (trial, step) = layout.position(index);
            return Err(Error::malformed(
                trial,
                step,
                format!("non-finite value {}", values[index]),
            ));
        }

        Ok(Self { layout, values })
    }

    /// Build from a step column and a value column of equal length
    ///
    /// A new trial starts at every row whose step does not exceed the
    /// previous row's step. Within a trial the step value must equal the
    /// record's position.
    pub fn from_step_column(steps: &[i64], values: &[f64], hint: ShapeHint) -> Result<Self> {
        if steps.len() != values.len() {
            return Err(Error::length_mismatch("value column", steps.len(), values.len()));
        }
        if steps.is_empty() {
            return Err(Error::malformed(0, 0, "table has no records"));
        }

        // Split rows into trials and check step bounds in the same scan
        let mut runs: Vec<(usize, usize)> = Vec::new();
        let mut previous: Option<usize> = None;
        let mut max_step = 0usize;
        for (row, &raw) in steps.iter().enumerate() {
            let trial = match previous {
                Some(prev) if raw >= 0 && (raw as usize) > prev => runs.len() - 1,
                _ => runs.len(),
            };
            let step = usize::try_from(raw).map_err(|_| {
                Error::malformed(trial, 0, format!("negative step value {raw} at row {row}"))
            })?;
            if trial == runs.len() {
                runs.push((row, 0));
            }
            runs[trial].1 += 1;
            max_step = max_step.max(step);
            previous = Some(step);
        }

        let step_count = hint.step_count.unwrap_or(max_step.saturating_add(1));
        if step_count == 0 {
            return Err(Error::InvalidConfiguration(
                "step count must be positive".to_string(),
            ));
        }

        for (trial, &(start, len)) in runs.iter().enumerate() {
            for &raw in &steps[start..start + len] {
                let step = raw as usize;
                if step >= step_count {
                    return Err(Error::malformed(
                        trial,
                        step,
                        format!("step {step} outside declared range 0..{step_count}"),
                    ));
                }
            }
        }
        if let Some(step) = first_empty_step(steps, step_count) {
            return Err(Error::MissingStepData { step });
        }

        for (trial, &(start, len)) in runs.iter().enumerate() {
            for (position, &raw) in steps[start..start + len].iter().enumerate() {
                if raw as usize != position {
                    return Err(Error::malformed(
                        trial,
                        position,
                        format!("expected step {position}, found step {raw}"),
                    ));
                }
            }
            if len != step_count {
                return Err(Error::malformed(
                    trial,
                    len,
                    format!("trial has {len} step(s), expected {step_count}"),
                ));
            }
        }

        let trial_count = runs.len();
        if let Some(declared) = hint.trial_count {
            if declared != trial_count {
                return Err(Error::malformed(
                    declared.min(trial_count),
                    0,
                    format!("found {trial_count} trial(s), expected {declared}"),
                ));
            }
        }

        debug!(trial_count, step_count, "validated step-indexed trial table");
        let layout = TrialLayout::new(trial_count, step_count)?;
        Self::from_contiguous(values.to_vec(), layout)
    }

    /// Read one quantity from a table source using its step column
    pub fn from_source<S: TableSource + ?Sized>(
        source: &S,
        step_column: &str,
        value_column: &str,
        hint: ShapeHint,
    ) -> Result<Self> {
        let steps = source.int_column(step_column)?;
        let values = source.float_column(value_column)?;
        Self::from_step_column(&steps, &values, hint)
    }

    pub fn layout(&self) -> TrialLayout {
        self.layout
    }

    pub fn trial_count(&self) -> usize {
        self.layout.trial_count
    }

    pub fn step_count(&self) -> usize {
        self.layout.step_count
    }

    /// All records, trial-major
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The records of one trial, in step order
    pub fn trial(&self, trial: usize) -> &[f64] {
        let start = self.layout.index(trial, 0);
        &self.values[start..start + self.layout.step_count]
    }

    /// The records of one step, one per trial
    pub fn step_values(&self, step: usize) -> impl Iterator<Item = f64> + '_ {
        self.values
            .iter()
            .skip(step)
            .step_by(self.layout.step_count)
            .copied()
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

/// Lowest step in `0..step_count` with no records
///
/// `n` records reach at most `n` distinct steps, so the search never looks
/// past step `n` however large the declared count is.
fn first_empty_step(steps: &[i64], step_count: usize) -> Option<usize> {
    let bound = step_count.min(steps.len() + 1);
    let mut seen = vec![false; bound];
    for &raw in steps {
        if let Ok(step) = usize::try_from(raw) {
            if step < bound {
                seen[step] = true;
            }
        }
    }
    seen.iter().position(|&reached| !reached)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(trials: usize, step_count: usize) -> Vec<i64> {
        (0..trials)
            .flat_map(|_| 0..step_count as i64)
            .collect()
    }

    #[test]
    fn test_layout_positions() {
        let layout = TrialLayout::new(3, 4).unwrap();
        assert_eq!(layout.record_count(), 12);
        assert_eq!(layout.index(2, 1), 9);
        assert_eq!(layout.position(9), (2, 1));
        assert!(TrialLayout::new(0, 4).is_err());
        assert!(TrialLayout::new(3, 0).is_err());
    }

    #[test]
    fn test_contiguous_short_table() {
        let layout = TrialLayout::new(3, 2).unwrap();
        let err = TrialMatrix::from_contiguous(vec![1.0; 5], layout).unwrap_err();
        match err {
            Error::MalformedInput { trial, step, .. } => {
                assert_eq!((trial, step), (2, 1));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_contiguous_rejects_nan() {
        let layout = TrialLayout::new(2, 2).unwrap();
        let err = TrialMatrix::from_contiguous(vec![1.0, 2.0, f64::NAN, 4.0], layout).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { trial: 1, step: 0, .. }));
    }

    #[test]
    fn test_step_column_infers_layout() {
        let steps = steps(3, 4);
        let values: Vec<f64> = (0..12).map(|v| v as f64).collect();
        let matrix = TrialMatrix::from_step_column(&steps, &values, ShapeHint::default()).unwrap();

        assert_eq!(matrix.trial_count(), 3);
        assert_eq!(matrix.step_count(), 4);
        assert_eq!(matrix.trial(1), &[4.0, 5.0, 6.0, 7.0]);
        assert_eq!(matrix.step_values(2).collect::<Vec<_>>(), vec![2.0, 6.0, 10.0]);
    }

    #[test]
    fn test_short_trial_is_malformed() {
        // Third trial stops after step 0
        let steps = vec![0, 1, 0, 1, 0];
        let values = vec![1.0; 5];
        let err =
            TrialMatrix::from_step_column(&steps, &values, ShapeHint::steps(2)).unwrap_err();
        match err {
            Error::MalformedInput { trial, step, .. } => {
                assert_eq!(trial, 2);
                assert_eq!(step, 1);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_skipped_step_is_malformed() {
        let steps = vec![0, 1, 2, 0, 2];
        let values = vec![1.0; 5];
        let err = TrialMatrix::from_step_column(&steps, &values, ShapeHint::default()).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { trial: 1, step: 1, .. }));
    }

    #[test]
    fn test_declared_step_without_records() {
        let steps = steps(2, 2);
        let values = vec![1.0; 4];
        let err =
            TrialMatrix::from_step_column(&steps, &values, ShapeHint::steps(3)).unwrap_err();
        assert!(matches!(err, Error::MissingStepData { step: 2 }));
    }

    #[test]
    fn test_step_beyond_declared_range() {
        let steps = vec![0, 1, 2, 0, 1, 2];
        let values = vec![1.0; 6];
        let err =
            TrialMatrix::from_step_column(&steps, &values, ShapeHint::steps(2)).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { trial: 0, step: 2, .. }));
    }

    #[test]
    fn test_trial_count_disagreement() {
        let steps = steps(2, 3);
        let values = vec![1.0; 6];
        let err =
            TrialMatrix::from_step_column(&steps, &values, ShapeHint::exact(3, 3)).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { .. }));
    }

    #[test]
    fn test_negative_step() {
        let err = TrialMatrix::from_step_column(&[0, -1], &[1.0, 1.0], ShapeHint::default())
            .unwrap_err();
        assert!(matches!(err, Error::MalformedInput { .. }));
    }

    #[test]
    fn test_empty_table() {
        let err = TrialMatrix::from_step_column(&[], &[], ShapeHint::default()).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { trial: 0, step: 0, .. }));
    }

    #[test]
    fn test_huge_step_value_is_missing_data() {
        // One corrupt step cell must not size any buffer
        let err = TrialMatrix::from_step_column(&[0, i64::MAX], &[1.0, 2.0], ShapeHint::default())
            .unwrap_err();
        assert!(matches!(err, Error::MissingStepData { step: 1 }));

        let err = TrialMatrix::from_step_column(
            &[0, 1, 0, 1],
            &[1.0; 4],
            ShapeHint::steps(usize::MAX),
        )
        .unwrap_err();
        assert!(matches!(err, Error::MissingStepData { step: 2 }));
    }
}
