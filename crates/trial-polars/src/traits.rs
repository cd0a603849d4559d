//! Extension trait for cross-trial aggregation on Polars DataFrames

use polars::prelude::*;
use trial_aggregate::{AggregateSeries, Aggregator, ShapeHint, TrialMatrix};

use crate::Result;

/// Extension trait for trial aggregation on a DataFrame of stacked runs
pub trait TrialStatsExt {
    /// Reshape one value column into a trial matrix
    ///
    /// # Arguments
    /// * `step_column` - Integer column holding each row's step index
    /// * `value_column` - Column to aggregate
    /// * `hint` - Expected trial and step counts, if known
    fn trial_matrix(
        &self,
        step_column: &str,
        value_column: &str,
        hint: ShapeHint,
    ) -> Result<TrialMatrix>;

    /// Aggregate each of `columns` across trials
    ///
    /// # Returns
    /// One `(column, series)` pair per requested column, in request order
    fn trial_aggregate_series(
        &self,
        aggregator: &Aggregator,
        step_column: &str,
        columns: &[&str],
        hint: ShapeHint,
    ) -> Result<Vec<(String, AggregateSeries)>>;

    /// Aggregate each of `columns` across trials into one frame
    ///
    /// # Returns
    /// DataFrame with `stepno` and `sampleSize`, then columns named
    /// `{column}_{field}` for every per-step field
    fn trial_aggregate(
        &self,
        aggregator: &Aggregator,
        step_column: &str,
        columns: &[&str],
        hint: ShapeHint,
    ) -> Result<DataFrame>;
}
