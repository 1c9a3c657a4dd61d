//! Configuration loading and runtime adjustment

pub mod config;

pub use config::{ConfigError, ConfigurationManager, EstimatorConfig};
