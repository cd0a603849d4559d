//! Confidence intervals for cross-trial means
//!
//! Each time step of a repeated simulation yields one sample per trial. The
//! interval for the step mean follows Student's t-distribution with
//! `trial_count - 1` degrees of freedom:
//!
//! `[mean + t(alpha/2) * se, mean + t(1 - alpha/2) * se]`
//!
//! # Example
//!
//! ```rust
//! use trial_confidence::{ConfidenceLevel, StudentTInterval};
//!
//! let level = ConfidenceLevel::new(0.95).unwrap();
//! let t = StudentTInterval::for_sample_size(level, 30).unwrap();
//! let ci = t.interval(12.0, 0.8);
//! assert!(ci.contains(12.0));
//! ```

mod student;
mod types;

pub use student::StudentTInterval;
pub use types::{ConfidenceInterval, ConfidenceLevel};
