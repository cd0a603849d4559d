//! Cross-trial aggregation of stochastic simulation time series
//!
//! Facade over the workspace crates:
//!
//! - [`trial_core`]: error taxonomy, trial layout, table interfaces
//! - [`trial_confidence`]: confidence levels and Student-t intervals
//! - [`trial_aggregate`]: the per-step aggregator and moving average
//! - [`trial_polars`]: DataFrame adapters, CSV/IPC persistence, plot data
//!
//! The `trial-stats` binary drives these from the command line.

pub mod cli;

pub use trial_aggregate;
pub use trial_confidence;
pub use trial_core;
pub use trial_polars;

pub use trial_aggregate::{
    AggregateSeries, AggregationConfig, Aggregator, DegeneratePolicy, ExecutionStrategy,
    MovingWindow, StepAggregate,
};
pub use trial_core::{Error, Result, ShapeHint};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
