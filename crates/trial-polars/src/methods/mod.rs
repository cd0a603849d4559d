//! Trait implementations

mod aggregate;

pub use aggregate::{combined_frame, series_to_frame};
