//! Error types and import-time key validation

pub mod duplicates;
pub mod error;

pub use duplicates::{BatchScreening, DuplicateKeyFilter, DuplicateReason};
pub use error::{EstimationError, EstimationResult};
