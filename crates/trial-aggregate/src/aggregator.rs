//! The trial-series aggregator

use crate::accumulate::{accumulate, StepAccumulator};
use crate::config::{AggregationConfig, DegeneratePolicy};
use crate::moments::StepMoments;
use crate::moving_average::trailing_moving_average;
use crate::series::{AggregateSeries, StepAggregate};
use tracing::{debug, instrument};
use trial_confidence::{ConfidenceInterval, ConfidenceLevel, StudentTInterval};
use trial_core::{Error, Result, ShapeHint, TableSource, TrialLayout, TrialMatrix};

/// Computes per-step statistics across repeated trials
///
/// Construction validates the configuration, so a bad level or window is
/// reported before any data is looked at. Each call to an `aggregate*`
/// method is independent and either returns a complete series or fails.
#[derive(Debug, Clone)]
pub struct Aggregator {
    config: AggregationConfig,
    level: ConfidenceLevel,
    window_steps: usize,
}

impl Aggregator {
    pub fn new(config: AggregationConfig) -> Result<Self> {
        let (level, window_steps) = config.validate()?;
        Ok(Self {
            config,
            level,
            window_steps,
        })
    }

    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Moving-average window in steps
    pub fn window_steps(&self) -> usize {
        self.window_steps
    }

    /// Aggregate a validated trial matrix
    #[instrument(skip(self, matrix), fields(trials = matrix.trial_count(), steps = matrix.step_count()))]
    pub fn aggregate(&self, matrix: &TrialMatrix) -> Result<AggregateSeries> {
        let layout = matrix.layout();
        let critical = self.critical_values(layout)?;

        let accumulators = accumulate(matrix, self.config.execution);
        let mut steps = accumulators
            .iter()
            .enumerate()
            .map(|(step, acc)| self.summarize(step, acc, critical.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let means: Vec<f64> = steps.iter().map(|s| s.mean).collect();
        let averages = trailing_moving_average(&means, self.window_steps)?;
        for (step, average) in steps.iter_mut().zip(averages) {
            step.moving_average = average;
        }

        debug!(
            level = self.level.value(),
            window = self.window_steps,
            "aggregated {} steps",
            steps.len()
        );
        Ok(AggregateSeries::new(layout, self.level, self.window_steps, steps))
    }

    /// Aggregate records already laid out trial-major
    pub fn aggregate_values(
        &self,
        values: &[f64],
        trial_count: usize,
        step_count: usize,
    ) -> Result<AggregateSeries> {
        let layout = TrialLayout::new(trial_count, step_count)?;
        let matrix = TrialMatrix::from_contiguous(values.to_vec(), layout)?;
        self.aggregate(&matrix)
    }

    /// Aggregate one column of a table, using its step column for layout
    pub fn aggregate_source<S: TableSource + ?Sized>(
        &self,
        source: &S,
        step_column: &str,
        value_column: &str,
        hint: ShapeHint,
    ) -> Result<AggregateSeries> {
        let matrix = TrialMatrix::from_source(source, step_column, value_column, hint)?;
        self.aggregate(&matrix)
    }

    /// Aggregate several columns of a table, reading the step column once
    ///
    /// Results keep the order of `value_columns`. The first failing column
    /// fails the whole call.
    #[instrument(skip(self, source, hint))]
    pub fn aggregate_columns<S: TableSource + ?Sized>(
        &self,
        source: &S,
        step_column: &str,
        value_columns: &[&str],
        hint: ShapeHint,
    ) -> Result<Vec<(String, AggregateSeries)>> {
        let steps = source.int_column(step_column)?;
        value_columns
            .iter()
            .map(|&column| {
                let values = source.float_column(column)?;
                let matrix = TrialMatrix::from_step_column(&steps, &values, hint)?;
                Ok((column.to_string(), self.aggregate(&matrix)?))
            })
            .collect()
    }

    fn critical_values(&self, layout: TrialLayout) -> Result<Option<StudentTInterval>> {
        if layout.trial_count() >= 2 {
            return StudentTInterval::for_sample_size(self.level, layout.trial_count()).map(Some);
        }
        match self.config.degenerate {
            DegeneratePolicy::Reject => Err(Error::DegenerateSample {
                trial_count: layout.trial_count(),
            }),
            DegeneratePolicy::ZeroWidth => {
                debug!("single trial, reporting zero-width intervals");
                Ok(None)
            }
        }
    }

    fn summarize(
        &self,
        step: usize,
        acc: &StepAccumulator,
        critical: Option<&StudentTInterval>,
    ) -> Result<StepAggregate> {
        let moments = StepMoments::from_accumulator(step, acc, self.config.degenerate)?;
        let interval = match critical {
            Some(t) => t.interval(moments.mean, moments.std_error),
            None => ConfidenceInterval::point(moments.mean, self.level.value()),
        };

        Ok(StepAggregate {
            step_index: step,
            count: acc.count,
            sum: acc.sum,
            sum_sq: acc.sum_sq,
            mean: moments.mean,
            variance: moments.variance,
            sample_variance: moments.sample_variance,
            std_error: moments.std_error,
            interval,
            moving_average: moments.mean,
        })
    }
}

/// One-shot aggregation of trial-major records
pub fn aggregate(
    values: &[f64],
    trial_count: usize,
    step_count: usize,
    confidence_level: f64,
    window_size: usize,
) -> Result<AggregateSeries> {
    let config = AggregationConfig::default()
        .with_confidence_level(confidence_level)
        .with_window(crate::MovingWindow::steps(window_size));
    Aggregator::new(config)?.aggregate_values(values, trial_count, step_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_two_step_scenario() {
        let values = [10.0, 5.0, 20.0, 5.0, 30.0, 5.0];
        let series = aggregate(&values, 3, 2, 0.95, 1).unwrap();

        assert_eq!(series.len(), 2);
        let first = series.get(0).unwrap();
        assert_relative_eq!(first.mean, 20.0);
        assert_relative_eq!(first.sample_variance, 100.0, epsilon = 1e-9);
        assert_relative_eq!(first.std_error, 5.773_502_69, epsilon = 1e-6);

        let second = series.get(1).unwrap();
        assert_relative_eq!(second.mean, 5.0);
        assert_eq!(second.interval.width(), 0.0);
    }

    #[test]
    fn test_configuration_checked_before_data() {
        // Malformed data and bad level: the level is reported
        let err = aggregate(&[1.0], 3, 2, 1.5, 1).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn test_single_trial_policy() {
        let err = aggregate(&[1.0, 2.0], 1, 2, 0.95, 1).unwrap_err();
        assert!(matches!(err, Error::DegenerateSample { trial_count: 1 }));

        let aggregator = Aggregator::new(AggregationConfig::default().allow_single_trial()).unwrap();
        let series = aggregator.aggregate_values(&[1.0, 2.0], 1, 2).unwrap();
        for step in &series {
            assert_eq!(step.lower_bound(), step.mean);
            assert_eq!(step.upper_bound(), step.mean);
            assert!(!step.std_error.is_nan());
        }
    }
}
