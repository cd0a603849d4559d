//! Error types for trial-polars

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error(transparent)]
    Trial(#[from] trial_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The aggregation error underneath, if this is one
    pub fn as_trial_error(&self) -> Option<&trial_core::Error> {
        match self {
            Error::Trial(e) => Some(e),
            _ => None,
        }
    }
}

/// Fold a polars failure into the core error type used by the table traits
pub(crate) fn into_core(err: polars::error::PolarsError) -> trial_core::Error {
    match err {
        polars::error::PolarsError::ColumnNotFound(name) => {
            trial_core::Error::InvalidColumn(name.to_string())
        }
        other => trial_core::Error::Other(other.into()),
    }
}
