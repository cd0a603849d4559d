//! Moment pass: mean, variance and standard error from running sums

use crate::accumulate::StepAccumulator;
use crate::config::DegeneratePolicy;
use serde::{Deserialize, Serialize};
use trial_core::{Error, Result};

/// First two moments of one step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepMoments {
    pub mean: f64,
    /// Population variance, clamped at zero
    pub variance: f64,
    /// Bessel-corrected variance
    pub sample_variance: f64,
    /// Standard error of the mean
    pub std_error: f64,
}

impl StepMoments {
    pub fn from_accumulator(
        step: usize,
        acc: &StepAccumulator,
        policy: DegeneratePolicy,
    ) -> Result<Self> {
        if acc.count == 0 {
            return Err(Error::MissingStepData { step });
        }

        let n = acc.count as f64;
        let mean = acc.sum / n;
        // sum_sq/n - mean^2 can dip below zero through cancellation
        let variance = (acc.sum_sq / n - mean * mean).max(0.0);

        if acc.count < 2 {
            return match policy {
                DegeneratePolicy::Reject => Err(Error::DegenerateSample {
                    trial_count: acc.count,
                }),
                DegeneratePolicy::ZeroWidth => Ok(Self {
                    mean,
                    variance: 0.0,
                    sample_variance: 0.0,
                    std_error: 0.0,
                }),
            };
        }

        let sample_variance = variance * n / (n - 1.0);
        let std_error = (sample_variance / n).sqrt();
        Ok(Self {
            mean,
            variance,
            sample_variance,
            std_error,
        })
    }
}
