//! Cross-trial aggregation of stochastic simulation time series
//!
//! Given `trial_count` runs of `step_count` steps each, the aggregator
//! produces one [`StepAggregate`] per step:
//!
//! 1. **Accumulation** of `sum` and `sum_sq` over the trials at each step
//! 2. **Moments**: mean, clamped population variance, Bessel-corrected
//!    sample variance and standard error
//! 3. **Confidence interval** from Student's t with `trial_count - 1`
//!    degrees of freedom
//! 4. **Trailing moving average** of the mean series, with a growing window
//!    at the start of the series
//!
//! Steps are independent of each other; with the `parallel` feature the
//! accumulation pass can be spread over a rayon pool.
//!
//! # Example
//!
//! ```rust
//! use trial_aggregate::{AggregationConfig, Aggregator, MovingWindow};
//!
//! // Three trials of two steps, trial-major
//! let values = [10.0, 5.0, 20.0, 5.0, 30.0, 5.0];
//!
//! let config = AggregationConfig::new(0.95, MovingWindow::steps(2));
//! let series = Aggregator::new(config)
//!     .unwrap()
//!     .aggregate_values(&values, 3, 2)
//!     .unwrap();
//!
//! assert_eq!(series.means(), vec![20.0, 5.0]);
//! assert_eq!(series.moving_averages(), vec![20.0, 12.5]);
//! ```

mod accumulate;
mod aggregator;
mod config;
mod moments;
mod moving_average;
pub mod plot;
mod series;

pub use accumulate::StepAccumulator;
pub use aggregator::{aggregate, Aggregator};
pub use config::{AggregationConfig, DegeneratePolicy, ExecutionStrategy, MovingWindow};
pub use moments::StepMoments;
pub use moving_average::trailing_moving_average;
pub use plot::{NullPlotSink, PlotSeries, PlotSink};
pub use series::{columns, AggregateSeries, StepAggregate};

// Re-export the types callers need alongside the aggregator
pub use trial_confidence::{ConfidenceInterval, ConfidenceLevel};
pub use trial_core::{Error, Result, ShapeHint, TrialLayout, TrialMatrix};
