//! Aggregation over DataFrame columns

use polars::prelude::*;
use tracing::{debug, instrument};
use trial_aggregate::{columns, AggregateSeries, Aggregator, ShapeHint, TrialMatrix};
use trial_core::NamedColumn;

use crate::source::{columns_to_frame, to_polars_column, FrameSource};
use crate::{Result, TrialStatsExt};

/// One aggregated series as a frame with the plain per-step column names
pub fn series_to_frame(series: &AggregateSeries) -> Result<DataFrame> {
    columns_to_frame(&series.to_columns())
}

/// Several aggregated series side by side
///
/// `stepno` and `sampleSize` come from the first series; every other field
/// is prefixed with its series name. All series must cover the same steps.
pub fn combined_frame(results: &[(String, AggregateSeries)]) -> Result<DataFrame> {
    let mut frame_columns: Vec<Column> = Vec::new();

    for (i, (name, series)) in results.iter().enumerate() {
        for column in series.to_columns() {
            let shared = column.name == columns::STEP || column.name == columns::SAMPLE_SIZE;
            if shared {
                if i == 0 {
                    frame_columns.push(to_polars_column(&column));
                }
                continue;
            }
            let renamed = NamedColumn {
                name: format!("{name}_{}", column.name),
                data: column.data,
            };
            frame_columns.push(to_polars_column(&renamed));
        }
    }

    if frame_columns.is_empty() {
        return Ok(DataFrame::empty());
    }
    Ok(DataFrame::new(frame_columns)?)
}

impl TrialStatsExt for DataFrame {
    fn trial_matrix(
        &self,
        step_column: &str,
        value_column: &str,
        hint: ShapeHint,
    ) -> Result<TrialMatrix> {
        Ok(TrialMatrix::from_source(
            &FrameSource::new(self),
            step_column,
            value_column,
            hint,
        )?)
    }

    #[instrument(skip(self, aggregator, hint), fields(rows = self.height()))]
    fn trial_aggregate_series(
        &self,
        aggregator: &Aggregator,
        step_column: &str,
        columns: &[&str],
        hint: ShapeHint,
    ) -> Result<Vec<(String, AggregateSeries)>> {
        let results =
            aggregator.aggregate_columns(&FrameSource::new(self), step_column, columns, hint)?;
        debug!(series = results.len(), "aggregated frame columns");
        Ok(results)
    }

    fn trial_aggregate(
        &self,
        aggregator: &Aggregator,
        step_column: &str,
        columns: &[&str],
        hint: ShapeHint,
    ) -> Result<DataFrame> {
        let results = self.trial_aggregate_series(aggregator, step_column, columns, hint)?;
        combined_frame(&results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use trial_aggregate::AggregationConfig;
    use trial_core::ColumnData;

    fn runs() -> DataFrame {
        df![
            "Step" => [0i64, 1, 0, 1, 0, 1],
            "Severe" => [10.0, 5.0, 20.0, 5.0, 30.0, 5.0],
            "Deceased" => [0i64, 1, 0, 2, 0, 3],
        ]
        .unwrap()
    }

    fn aggregator() -> Aggregator {
        Aggregator::new(AggregationConfig::default()).unwrap()
    }

    #[test]
    fn test_trial_matrix_from_frame() {
        let matrix = runs()
            .trial_matrix("Step", "Severe", ShapeHint::default())
            .unwrap();
        assert_eq!(matrix.trial_count(), 3);
        assert_eq!(matrix.step_count(), 2);
        assert_eq!(matrix.trial(1), &[20.0, 5.0]);
    }

    #[test]
    fn test_combined_frame_layout() {
        let df = runs()
            .trial_aggregate(&aggregator(), "Step", &["Severe", "Deceased"], ShapeHint::default())
            .unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 2 + 2 * columns::FLOAT_FIELDS.len());
        let names: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(&names[..3], &["stepno", "sampleSize", "Severe_average"]);

        let means = df.column("Severe_average").unwrap().f64().unwrap();
        assert_relative_eq!(means.get(0).unwrap(), 20.0);
        let deceased = df.column("Deceased_average").unwrap().f64().unwrap();
        assert_relative_eq!(deceased.get(1).unwrap(), 2.0);
    }

    #[test]
    fn test_series_to_frame_names() {
        let results = runs()
            .trial_aggregate_series(&aggregator(), "Step", &["Severe"], ShapeHint::default())
            .unwrap();
        let df = series_to_frame(&results[0].1).unwrap();
        assert_eq!(df.width(), 2 + columns::FLOAT_FIELDS.len());
        assert!(df.column(columns::MOVING_AVERAGE).is_ok());
        assert!(matches!(
            results[0].1.to_columns()[0].data,
            ColumnData::Int(_)
        ));
    }

    #[test]
    fn test_unknown_column_fails() {
        let err = runs()
            .trial_aggregate(&aggregator(), "Step", &["Severe", "Rt"], ShapeHint::default())
            .unwrap_err();
        assert!(matches!(
            err.as_trial_error(),
            Some(trial_core::Error::InvalidColumn(_))
        ));
    }
}
