//! Error types for position estimation

use thiserror::Error;

/// Errors raised by the position estimator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimationError {
    /// Input violates the estimator's contract (e.g. no observations at all)
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },
    /// Distance proxy parameter that would make a weight infinite, zero or negative
    #[error("Invalid distance proxy {parameter} = {value}: {reason}")]
    InvalidProxy {
        parameter: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl EstimationError {
    pub(crate) fn no_observations() -> Self {
        EstimationError::InvalidArgument {
            reason: "at least one gateway observation is required".to_string(),
        }
    }
}

/// Result type for estimation operations
pub type EstimationResult<T> = Result<T, EstimationError>;
