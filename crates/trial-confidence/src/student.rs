//! Two-tailed Student-t intervals for a mean with known standard error

use crate::{ConfidenceInterval, ConfidenceLevel};
use statrs::distribution::{ContinuousCDF, StudentsT};
use tracing::debug;
use trial_core::{Error, Result};

/// Critical values of a two-tailed Student-t interval
///
/// All steps of one aggregation share the degrees of freedom, so the
/// quantiles are computed once and applied to every step's standard error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudentTInterval {
    level: ConfidenceLevel,
    degrees_of_freedom: f64,
    /// Quantile at alpha/2 (negative)
    t_lower: f64,
    /// Quantile at 1 - alpha/2 (positive)
    t_upper: f64,
}

impl StudentTInterval {
    /// Critical values for `sample_size` observations (`sample_size - 1`
    /// degrees of freedom)
    pub fn for_sample_size(level: ConfidenceLevel, sample_size: usize) -> Result<Self> {
        if sample_size < 2 {
            return Err(Error::DegenerateSample {
                trial_count: sample_size,
            });
        }
        Self::with_degrees_of_freedom(level, (sample_size - 1) as f64)
    }

    pub fn with_degrees_of_freedom(level: ConfidenceLevel, degrees_of_freedom: f64) -> Result<Self> {
        let t_dist = StudentsT::new(0.0, 1.0, degrees_of_freedom).map_err(|e| {
            Error::Computation(format!("Failed to create t-distribution: {}", e))
        })?;

        let tail = level.tail_probability();
        let t_lower = t_dist.inverse_cdf(tail);
        let t_upper = t_dist.inverse_cdf(1.0 - tail);
        if !t_lower.is_finite() || !t_upper.is_finite() {
            return Err(Error::Computation(format!(
                "t quantiles for {level} with {degrees_of_freedom} degrees of freedom are not finite"
            )));
        }
        debug!(
            level = level.value(),
            degrees_of_freedom, t_lower, t_upper, "computed t critical values"
        );

        Ok(Self {
            level,
            degrees_of_freedom,
            t_lower,
            t_upper,
        })
    }

    pub fn level(&self) -> ConfidenceLevel {
        self.level
    }

    pub fn degrees_of_freedom(&self) -> f64 {
        self.degrees_of_freedom
    }

    /// The (alpha/2, 1 - alpha/2) quantiles
    pub fn quantiles(&self) -> (f64, f64) {
        (self.t_lower, self.t_upper)
    }

    /// Interval `[mean + t_lo * se, mean + t_hi * se]`
    pub fn interval(&self, mean: f64, std_error: f64) -> ConfidenceInterval {
        ConfidenceInterval::new(
            mean + self.t_lower * std_error,
            mean + self.t_upper * std_error,
            mean,
            self.level.value(),
        )
    }
}
