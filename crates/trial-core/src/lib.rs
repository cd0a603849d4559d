//! Core types for cross-trial aggregation of simulation output
//!
//! A stochastic simulation is run many times (trials); each trial records
//! the same tracked quantities at every time step. This crate holds what
//! every other crate in the workspace agrees on:
//!
//! - the error taxonomy ([`Error`])
//! - the trial layout and the validated, rectangular [`TrialMatrix`]
//! - the narrow [`TableSource`] / [`TableSink`] interfaces that keep the
//!   statistics independent of any dataframe or file format
//! - the column schema of the epidemiological model's CSV output
//!
//! # Example
//!
//! ```rust
//! use trial_core::{MemoryTable, NamedColumn, ShapeHint, TrialMatrix};
//!
//! let table = MemoryTable::from_columns(vec![
//!     NamedColumn::int("Step", vec![0, 1, 0, 1]),
//!     NamedColumn::float("Severe", vec![1.0, 2.0, 3.0, 4.0]),
//! ])
//! .unwrap();
//!
//! let matrix = TrialMatrix::from_source(&table, "Step", "Severe", ShapeHint::default()).unwrap();
//! assert_eq!(matrix.trial_count(), 2);
//! assert_eq!(matrix.step_count(), 2);
//! ```

pub mod error;
pub mod layout;
pub mod schema;
pub mod table;

pub use error::{Error, Result};
pub use layout::{ShapeHint, TrialLayout, TrialMatrix};
pub use schema::{simulation_schema, DEFAULT_STEPS_PER_DAY, STEP_COLUMN, TRACKED_QUANTITIES};
pub use table::{ColumnData, ColumnKind, ColumnSchema, MemoryTable, NamedColumn, TableSink, TableSource};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::layout::{ShapeHint, TrialLayout, TrialMatrix};
    pub use crate::table::{NamedColumn, TableSink, TableSource};
}
