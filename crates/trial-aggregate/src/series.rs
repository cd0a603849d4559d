//! Per-step aggregates and the series that holds them

use crate::plot::PlotSeries;
use serde::{Deserialize, Serialize};
use trial_confidence::{ConfidenceInterval, ConfidenceLevel, StudentTInterval};
use trial_core::{Error, NamedColumn, Result, TableSink, TrialLayout};

/// Column names written by [`AggregateSeries::to_columns`]
pub mod columns {
    pub const STEP: &str = "stepno";
    pub const SAMPLE_SIZE: &str = "sampleSize";
    pub const MEAN: &str = "average";
    pub const MOVING_AVERAGE: &str = "dayAverage";
    pub const STD_ERROR: &str = "stdError";
    pub const LOWER: &str = "lowerCI";
    pub const UPPER: &str = "upperCI";
    pub const ERROR_LOW: &str = "errorLow";
    pub const ERROR_HIGH: &str = "errorHigh";

    /// Float columns, in output order
    pub const FLOAT_FIELDS: &[&str] = &[
        MEAN,
        MOVING_AVERAGE,
        STD_ERROR,
        LOWER,
        UPPER,
        ERROR_LOW,
        ERROR_HIGH,
    ];
}

/// Statistics of one time step across all trials
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepAggregate {
    pub step_index: usize,
    pub count: usize,
    pub sum: f64,
    pub sum_sq: f64,
    pub mean: f64,
    pub variance: f64,
    pub sample_variance: f64,
    pub std_error: f64,
    pub interval: ConfidenceInterval,
    /// Trailing average of the mean series ending at this step
    pub moving_average: f64,
}

impl StepAggregate {
    pub fn lower_bound(&self) -> f64 {
        self.interval.lower
    }

    pub fn upper_bound(&self) -> f64 {
        self.interval.upper
    }

    /// Plot-ready `(mean - lower, upper - mean)`
    pub fn error_bar(&self) -> (f64, f64) {
        (self.interval.error_below(), self.interval.error_above())
    }
}

/// Complete aggregation result for one tracked quantity
///
/// Deserialization checks that there is one aggregate per step of the layout,
/// in step order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SeriesData")]
pub struct AggregateSeries {
    layout: TrialLayout,
    confidence_level: ConfidenceLevel,
    window_steps: usize,
    steps: Vec<StepAggregate>,
}

#[derive(Deserialize)]
struct SeriesData {
    layout: TrialLayout,
    confidence_level: ConfidenceLevel,
    window_steps: usize,
    steps: Vec<StepAggregate>,
}

impl TryFrom<SeriesData> for AggregateSeries {
    type Error = Error;

    fn try_from(data: SeriesData) -> Result<Self> {
        let layout = TrialLayout::new(data.layout.trial_count(), data.layout.step_count())?;
        if data.window_steps == 0 {
            return Err(Error::InvalidConfiguration(
                "moving-average window must span at least one step".into(),
            ));
        }
        if data.steps.len() != layout.step_count() {
            return Err(Error::InvalidConfiguration(format!(
                "series holds {} step aggregates, layout declares {}",
                data.steps.len(),
                layout.step_count()
            )));
        }
        if let Some((position, step)) = data
            .steps
            .iter()
            .enumerate()
            .find(|(position, step)| step.step_index != *position)
        {
            return Err(Error::malformed(
                0,
                position,
                format!("aggregate for step {} stored at position {position}", step.step_index),
            ));
        }

        Ok(Self::new(
            layout,
            data.confidence_level,
            data.window_steps,
            data.steps,
        ))
    }
}

impl AggregateSeries {
    pub(crate) fn new(
        layout: TrialLayout,
        confidence_level: ConfidenceLevel,
        window_steps: usize,
        steps: Vec<StepAggregate>,
    ) -> Self {
        debug_assert_eq!(steps.len(), layout.step_count());
        Self {
            layout,
            confidence_level,
            window_steps,
            steps,
        }
    }

    pub fn layout(&self) -> TrialLayout {
        self.layout
    }

    pub fn confidence_level(&self) -> ConfidenceLevel {
        self.confidence_level
    }

    /// Moving-average window in steps
    pub fn window_steps(&self) -> usize {
        self.window_steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[StepAggregate] {
        &self.steps
    }

    pub fn get(&self, step: usize) -> Option<&StepAggregate> {
        self.steps.get(step)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StepAggregate> {
        self.steps.iter()
    }

    pub fn means(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.mean).collect()
    }

    pub fn moving_averages(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.moving_average).collect()
    }

    pub fn std_errors(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.std_error).collect()
    }

    pub fn lower_bounds(&self) -> Vec<f64> {
        self.steps.iter().map(StepAggregate::lower_bound).collect()
    }

    pub fn upper_bounds(&self) -> Vec<f64> {
        self.steps.iter().map(StepAggregate::upper_bound).collect()
    }

    pub fn error_bars(&self) -> Vec<(f64, f64)> {
        self.steps.iter().map(StepAggregate::error_bar).collect()
    }

    /// Intervals at another confidence level, from the stored standard errors
    ///
    /// Single-trial series (accepted under the zero-width policy) yield point
    /// intervals at every level.
    pub fn interval_band(&self, level: f64) -> Result<Vec<ConfidenceInterval>> {
        let level = ConfidenceLevel::new(level)?;
        if self.layout.trial_count() < 2 {
            return Ok(self
                .steps
                .iter()
                .map(|s| ConfidenceInterval::point(s.mean, level.value()))
                .collect());
        }

        let t = StudentTInterval::for_sample_size(level, self.layout.trial_count())?;
        Ok(self
            .steps
            .iter()
            .map(|s| t.interval(s.mean, s.std_error))
            .collect())
    }

    /// Mean line with its error band and moving-average overlay
    ///
    /// `x_scale` converts steps to the plotted unit: x = step / x_scale. The
    /// axis reads "Step" at scale 1 and "Units" otherwise.
    pub fn plot_series(&self, title: &str, x_scale: f64) -> Result<PlotSeries> {
        if !(x_scale.is_finite() && x_scale > 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "x scale {x_scale} must be a positive number"
            )));
        }

        let x = self
            .steps
            .iter()
            .map(|s| s.step_index as f64 / x_scale)
            .collect();
        let (low, high) = self.error_bars().into_iter().unzip();
        let x_label = if x_scale == 1.0 { "Step" } else { "Units" };

        Ok(PlotSeries::new(title, x, self.means())
            .with_labels(x_label, title)
            .with_errors(low, high)
            .with_overlay(self.moving_averages()))
    }

    /// Flat named columns, one row per step
    pub fn to_columns(&self) -> Vec<NamedColumn> {
        let (error_low, error_high): (Vec<f64>, Vec<f64>) = self.error_bars().into_iter().unzip();
        vec![
            NamedColumn::int(
                columns::STEP,
                self.steps.iter().map(|s| s.step_index as i64).collect(),
            ),
            NamedColumn::int(
                columns::SAMPLE_SIZE,
                self.steps.iter().map(|s| s.count as i64).collect(),
            ),
            NamedColumn::float(columns::MEAN, self.means()),
            NamedColumn::float(columns::MOVING_AVERAGE, self.moving_averages()),
            NamedColumn::float(columns::STD_ERROR, self.std_errors()),
            NamedColumn::float(columns::LOWER, self.lower_bounds()),
            NamedColumn::float(columns::UPPER, self.upper_bounds()),
            NamedColumn::float(columns::ERROR_LOW, error_low),
            NamedColumn::float(columns::ERROR_HIGH, error_high),
        ]
    }

    /// Hand the flat columns to a persistence sink
    pub fn write_to<S: TableSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        sink.write_columns(&self.to_columns())
    }
}

impl<'a> IntoIterator for &'a AggregateSeries {
    type Item = &'a StepAggregate;
    type IntoIter = std::slice::Iter<'a, StepAggregate>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
