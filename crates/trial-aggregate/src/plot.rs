//! Plotting sink interface
//!
//! The aggregator prepares point series; drawing them is left to whatever
//! implements [`PlotSink`]. [`NullPlotSink`] discards everything.

use serde::{Deserialize, Serialize};
use std::path::Path;
use trial_core::{Error, Result};

/// A line with an optional asymmetric error band and overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSeries {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Distance from `y` down to the lower band edge
    pub error_low: Option<Vec<f64>>,
    /// Distance from `y` up to the upper band edge
    pub error_high: Option<Vec<f64>>,
    /// Second line drawn over the band
    pub overlay: Option<Vec<f64>>,
}

impl PlotSeries {
    pub fn new(title: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            title: title.into(),
            x_label: "Step".to_string(),
            y_label: String::new(),
            x,
            y,
            error_low: None,
            error_high: None,
            overlay: None,
        }
    }

    pub fn with_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    pub fn with_errors(mut self, low: Vec<f64>, high: Vec<f64>) -> Self {
        self.error_low = Some(low);
        self.error_high = Some(high);
        self
    }

    pub fn with_overlay(mut self, overlay: Vec<f64>) -> Self {
        self.overlay = Some(overlay);
        self
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// All present series must match the x length
    pub fn validate(&self) -> Result<()> {
        let n = self.x.len();
        let optional = [
            ("error_low", self.error_low.as_ref()),
            ("error_high", self.error_high.as_ref()),
            ("overlay", self.overlay.as_ref()),
        ];
        if self.y.len() != n {
            return Err(Error::length_mismatch("y", n, self.y.len()));
        }
        for (name, values) in optional {
            if let Some(values) = values {
                if values.len() != n {
                    return Err(Error::length_mismatch(name, n, values.len()));
                }
            }
        }
        Ok(())
    }
}

/// Receives plot-ready series
pub trait PlotSink {
    /// Render `series` to `destination`; the format is the sink's choice
    fn render(&mut self, series: &PlotSeries, destination: &Path) -> Result<()>;
}

/// Sink that accepts and discards every series
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPlotSink;

impl PlotSink for NullPlotSink {
    fn render(&mut self, series: &PlotSeries, _destination: &Path) -> Result<()> {
        series.validate()
    }
}
