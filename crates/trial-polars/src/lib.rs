//! Polars integration for cross-trial aggregation
//!
//! This crate connects Polars DataFrames to the table, plot and persistence
//! seams of `trial-aggregate`: CSV input, Arrow IPC output, CSV plot data
//! and a single extension trait for aggregating stacked simulation runs.
//!
//! # Example
//!
//! ```rust
//! use polars::prelude::*;
//! use trial_aggregate::{AggregationConfig, Aggregator, ShapeHint};
//! use trial_polars::TrialStatsExt;
//!
//! // Three runs of two steps, stacked
//! let df = df![
//!     "Step" => [0i64, 1, 0, 1, 0, 1],
//!     "Severe" => [10.0, 5.0, 20.0, 5.0, 30.0, 5.0],
//! ]
//! .unwrap();
//!
//! let aggregator = Aggregator::new(AggregationConfig::default()).unwrap();
//! let stats = df
//!     .trial_aggregate(&aggregator, "Step", &["Severe"], ShapeHint::default())
//!     .unwrap();
//! assert_eq!(stats.height(), 2);
//! ```

mod error;
mod io;
mod methods;
mod plot;
mod source;
mod traits;

pub use error::{Error, Result};
pub use io::{read_ipc, read_trial_csv, write_csv, write_ipc};
pub use methods::{combined_frame, series_to_frame};
pub use plot::{plot_columns, plot_frame, CsvPlotSink};
pub use source::{columns_to_frame, to_polars_column, FrameSink, FrameSource};
pub use traits::*;
