//! Error types for cross-trial aggregation
//!
//! Provides a unified error type for all trial-stats crates.

use thiserror::Error;

/// Core error type for aggregation and table operations
#[derive(Error, Debug)]
pub enum Error {
    /// Table is not rectangular, or an index falls outside the declared layout
    #[error("Malformed input at trial {trial}, step {step}: {reason}")]
    MalformedInput {
        trial: usize,
        step: usize,
        reason: String,
    },

    /// A declared step index has no contributing records
    #[error("Missing step data: step {step} has no records")]
    MissingStepData { step: usize },

    /// Too few trials for a sample variance
    #[error("Degenerate sample: {trial_count} trial(s), at least 2 are needed for a sample variance")]
    DegenerateSample { trial_count: usize },

    /// Rejected configuration parameter
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Column not present in the table
    #[error("Invalid column: {0}")]
    InvalidColumn(String),

    /// Column has an unexpected type
    #[error("Type mismatch in column {column}: expected {expected}, got {got}")]
    TypeMismatch {
        column: String,
        expected: String,
        got: String,
    },

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// IO error (for file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create a malformed-input error for a given record position
    pub fn malformed(trial: usize, step: usize, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            trial,
            step,
            reason: reason.into(),
        }
    }

    /// Create an error for a confidence level outside (0, 1)
    pub fn invalid_level(level: f64) -> Self {
        Self::InvalidConfiguration(format!("confidence level {level} must be in (0, 1)"))
    }

    /// Create an error for columns of different lengths
    pub fn length_mismatch(column: &str, expected: usize, actual: usize) -> Self {
        Self::InvalidColumn(format!("{column} has {actual} rows, expected {expected}"))
    }

    /// True for the data-validity kinds (as opposed to configuration or IO)
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedInput { .. } | Self::MissingStepData { .. } | Self::DegenerateSample { .. }
        )
    }
}
