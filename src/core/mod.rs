//! Core types and constants for gateway-based positioning

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
