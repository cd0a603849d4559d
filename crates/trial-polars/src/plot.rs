//! Plot data written as CSV
//!
//! Drawing is left to external tooling; [`CsvPlotSink`] persists the point
//! series it would draw from.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use trial_aggregate::{PlotSeries, PlotSink};

use crate::error::into_core;

/// Column names of a plot data file
pub mod plot_columns {
    pub const X: &str = "x";
    pub const Y: &str = "y";
    pub const ERROR_LOW: &str = "errorLow";
    pub const ERROR_HIGH: &str = "errorHigh";
    pub const MOVING_AVERAGE: &str = "movingAverage";
}

/// Frame of a plot series; optional parts become columns only when present
pub fn plot_frame(series: &PlotSeries) -> crate::Result<DataFrame> {
    series.validate()?;

    let mut columns: Vec<Column> = vec![
        Series::new(plot_columns::X.into(), series.x.as_slice()).into(),
        Series::new(plot_columns::Y.into(), series.y.as_slice()).into(),
    ];
    let optional = [
        (plot_columns::ERROR_LOW, series.error_low.as_ref()),
        (plot_columns::ERROR_HIGH, series.error_high.as_ref()),
        (plot_columns::MOVING_AVERAGE, series.overlay.as_ref()),
    ];
    for (name, values) in optional {
        if let Some(values) = values {
            columns.push(Series::new(name.into(), values.as_slice()).into());
        }
    }

    Ok(DataFrame::new(columns)?)
}

/// [`PlotSink`] writing each series to `<destination>.csv`
///
/// The suffix is appended, never substituted, so dotted quantity names
/// each get their own file.
#[derive(Debug, Clone, Default)]
pub struct CsvPlotSink {
    written: Vec<PathBuf>,
}

impl CsvPlotSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files written so far, in render order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl PlotSink for CsvPlotSink {
    fn render(&mut self, series: &PlotSeries, destination: &Path) -> trial_core::Result<()> {
        let path = csv_path(destination);
        let mut df = plot_frame(series).map_err(into_trial)?;
        crate::io::write_csv(&path, &mut df).map_err(into_trial)?;
        tracing::debug!(title = %series.title, path = %path.display(), "wrote plot data");
        self.written.push(path);
        Ok(())
    }
}

/// `destination` with `.csv` appended to its full file name
fn csv_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".csv");
    destination.with_file_name(name)
}

fn into_trial(err: crate::Error) -> trial_core::Error {
    match err {
        crate::Error::Trial(e) => e,
        crate::Error::Polars(e) => into_core(e),
        crate::Error::Io(e) => trial_core::Error::Io(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_frame_columns() {
        let series = PlotSeries::new("Severe", vec![0.0, 1.0], vec![2.0, 3.0])
            .with_errors(vec![0.5, 0.5], vec![0.5, 0.5]);
        let df = plot_frame(&series).unwrap();
        let names: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, vec!["x", "y", "errorLow", "errorHigh"]);
    }

    #[test]
    fn test_ragged_series_rejected() {
        let series = PlotSeries::new("Severe", vec![0.0, 1.0], vec![2.0]);
        assert!(plot_frame(&series).is_err());

        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvPlotSink::new();
        assert!(sink.render(&series, &dir.path().join("Severe")).is_err());
        assert!(sink.written().is_empty());
        assert!(!dir.path().join("Severe.csv").exists());
    }

    #[test]
    fn test_render_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let series = PlotSeries::new("Exposed", vec![0.0, 0.5, 1.0], vec![1.0, 2.0, 4.0])
            .with_errors(vec![0.1, 0.2, 0.3], vec![0.1, 0.2, 0.3])
            .with_overlay(vec![1.0, 1.5, 7.0 / 3.0]);

        let mut sink = CsvPlotSink::new();
        sink.render(&series, &dir.path().join("Exposed")).unwrap();

        let path = dir.path().join("Exposed.csv");
        assert_eq!(sink.written(), &[path.clone()]);
        let text = std::fs::read_to_string(path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("x,y,errorLow,errorHigh,movingAverage"));
        assert_eq!(lines.count(), 3);
    }

    #[test]
    fn test_dotted_titles_get_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvPlotSink::new();
        for title in ["Rt.low", "Rt.high"] {
            let series = PlotSeries::new(title, vec![0.0, 1.0], vec![1.0, 2.0]);
            sink.render(&series, &dir.path().join(title)).unwrap();
        }

        let low = dir.path().join("Rt.low.csv");
        let high = dir.path().join("Rt.high.csv");
        assert_eq!(sink.written(), &[low.clone(), high.clone()]);
        assert!(low.exists() && high.exists());
        assert!(!dir.path().join("Rt.csv").exists());
    }
}
