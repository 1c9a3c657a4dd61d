//! Gateway Position Estimation
//!
//! Estimates where an IoT node (LoRa sensor, BLE tag) is from the RSSI its
//! transmissions were received with at fixed gateways, and screens imported
//! device keys for duplicates with a sorted-list membership search.

pub mod core;
pub mod algorithms;
pub mod validation;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use crate::core::{EstimatedPosition, GatewayObservation};
pub use algorithms::{contains, estimate, DistanceProxy, EstimateDiagnostics, SortedKeys, WeightedPositionEstimator};
pub use validation::{BatchScreening, DuplicateKeyFilter, DuplicateReason, EstimationError, EstimationResult};
pub use utils::{ConfigError, ConfigurationManager, EstimatorConfig};
pub use api::{CsvFormatter, FormattedPosition, JsonFormatter, OutputFormat, PositionFormatter, TextFormatter};
