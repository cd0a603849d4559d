//! Configuration types for the aggregator

use serde::{Deserialize, Serialize};
use trial_confidence::ConfidenceLevel;
use trial_core::{Error, Result};

/// Trailing moving-average window
///
/// The window is `length` units of `steps_per_unit` steps each, e.g. seven
/// days of a model sampled 96 times per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovingWindow {
    /// Window length in units
    pub length: usize,
    /// Steps per unit
    pub steps_per_unit: usize,
}

impl MovingWindow {
    pub fn new(length: usize, steps_per_unit: usize) -> Self {
        Self {
            length,
            steps_per_unit,
        }
    }

    /// Window measured directly in steps
    pub fn steps(length: usize) -> Self {
        Self::new(length, 1)
    }

    /// Effective window width in steps
    pub fn effective_steps(&self) -> Result<usize> {
        if self.length == 0 {
            return Err(Error::InvalidConfiguration(
                "moving-average window must be positive".to_string(),
            ));
        }
        if self.steps_per_unit == 0 {
            return Err(Error::InvalidConfiguration(
                "steps per window unit must be positive".to_string(),
            ));
        }
        self.length.checked_mul(self.steps_per_unit).ok_or_else(|| {
            Error::InvalidConfiguration(format!(
                "window of {} x {} steps overflows",
                self.length, self.steps_per_unit
            ))
        })
    }
}

impl Default for MovingWindow {
    fn default() -> Self {
        Self::steps(7)
    }
}

/// What to do when fewer than two trials are available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Fail with `DegenerateSample`
    #[default]
    Reject,
    /// Report the mean with a zero-width interval
    ZeroWidth,
}

/// How per-step work is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStrategy {
    #[default]
    Sequential,
    /// Steps distributed over the rayon pool; requires the `parallel` feature
    Parallel,
}

/// Aggregation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    pub confidence_level: f64,
    pub window: MovingWindow,
    pub degenerate: DegeneratePolicy,
    pub execution: ExecutionStrategy,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            confidence_level: ConfidenceLevel::NINETY_FIVE.value(),
            window: MovingWindow::default(),
            degenerate: DegeneratePolicy::default(),
            execution: ExecutionStrategy::default(),
        }
    }
}

impl AggregationConfig {
    pub fn new(confidence_level: f64, window: MovingWindow) -> Self {
        Self {
            confidence_level,
            window,
            ..Self::default()
        }
    }

    pub fn with_confidence_level(mut self, level: f64) -> Self {
        self.confidence_level = level;
        self
    }

    pub fn with_window(mut self, window: MovingWindow) -> Self {
        self.window = window;
        self
    }

    /// Accept single-trial input, reporting zero-width intervals
    pub fn allow_single_trial(mut self) -> Self {
        self.degenerate = DegeneratePolicy::ZeroWidth;
        self
    }

    pub fn with_execution(mut self, execution: ExecutionStrategy) -> Self {
        self.execution = execution;
        self
    }

    /// Check every parameter; returns the level and the window in steps
    pub fn validate(&self) -> Result<(ConfidenceLevel, usize)> {
        let level = ConfidenceLevel::new(self.confidence_level)?;
        let window_steps = self.window.effective_steps()?;
        if self.execution == ExecutionStrategy::Parallel && !cfg!(feature = "parallel") {
            return Err(Error::InvalidConfiguration(
                "parallel execution requires the `parallel` feature".to_string(),
            ));
        }
        Ok((level, window_steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let (level, window) = AggregationConfig::default().validate().unwrap();
        assert_eq!(level.value(), 0.95);
        assert_eq!(window, 7);
    }

    #[test]
    fn test_window_scaling() {
        // Seven days sampled every 15 minutes
        assert_eq!(MovingWindow::new(7, 96).effective_steps().unwrap(), 672);
    }

    #[test]
    fn test_invalid_parameters() {
        let bad_level = AggregationConfig::default().with_confidence_level(1.0);
        assert!(matches!(
            bad_level.validate().unwrap_err(),
            Error::InvalidConfiguration(_)
        ));

        let bad_window = AggregationConfig::default().with_window(MovingWindow::steps(0));
        assert!(matches!(
            bad_window.validate().unwrap_err(),
            Error::InvalidConfiguration(_)
        ));

        let bad_scale = AggregationConfig::default().with_window(MovingWindow::new(7, 0));
        assert!(bad_scale.validate().is_err());

        let overflow = AggregationConfig::default().with_window(MovingWindow::new(usize::MAX, 2));
        assert!(overflow.validate().is_err());
    }

    #[test]
    fn test_parallel_availability() {
        let config = AggregationConfig::default().with_execution(ExecutionStrategy::Parallel);
        assert_eq!(config.validate().is_ok(), cfg!(feature = "parallel"));
    }
}
