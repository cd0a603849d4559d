//! Accumulation pass: running sums per step

use crate::config::ExecutionStrategy;
use serde::{Deserialize, Serialize};
use trial_core::TrialMatrix;

/// Cross-trial sums for one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StepAccumulator {
    pub count: usize,
    pub sum: f64,
    pub sum_sq: f64,
}

impl StepAccumulator {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.sum_sq += value * value;
    }

    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Self {
        values.into_iter().fold(Self::default(), |mut acc, v| {
            acc.push(v);
            acc
        })
    }
}

/// Accumulate every step of a matrix
///
/// Both strategies add each step's values in trial order, so their results
/// are bit-identical.
pub fn accumulate(matrix: &TrialMatrix, strategy: ExecutionStrategy) -> Vec<StepAccumulator> {
    match strategy {
        ExecutionStrategy::Sequential => accumulate_sequential(matrix),
        #[cfg(feature = "parallel")]
        ExecutionStrategy::Parallel => accumulate_parallel(matrix),
        #[cfg(not(feature = "parallel"))]
        ExecutionStrategy::Parallel => accumulate_sequential(matrix),
    }
}

fn accumulate_sequential(matrix: &TrialMatrix) -> Vec<StepAccumulator> {
    let mut accumulators = vec![StepAccumulator::default(); matrix.step_count()];
    // Trial-major scan follows the storage order
    for trial in 0..matrix.trial_count() {
        for (acc, &value) in accumulators.iter_mut().zip(matrix.trial(trial)) {
            acc.push(value);
        }
    }
    accumulators
}

#[cfg(feature = "parallel")]
fn accumulate_parallel(matrix: &TrialMatrix) -> Vec<StepAccumulator> {
    use rayon::prelude::*;

    (0..matrix.step_count())
        .into_par_iter()
        .map(|step| StepAccumulator::from_values(matrix.step_values(step)))
        .collect()
}
