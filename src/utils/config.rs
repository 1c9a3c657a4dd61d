use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::algorithms::weighted_centroid::{DistanceProxy, WeightedPositionEstimator};
use crate::validation::error::EstimationError;

/// Estimator configuration as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// RSSI breakpoints and cap distances
    #[serde(default)]
    pub distance_proxy: DistanceProxy,
    /// Enable debug logging
    #[serde(default)]
    pub debug_logging: bool,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid parameter value
    #[error("Invalid parameter {parameter} = {value}: {reason}")]
    InvalidParameter { parameter: String, value: String, reason: String },
    /// Configuration file I/O error
    #[error("Config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// JSON serialization/deserialization error
    #[error("Config file '{path}' is not valid configuration: {source}")]
    Serialization {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// No file path known for `save`
    #[error("No file path set for saving configuration")]
    NoPath,
}

/// Configuration validation result
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigError>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Loads, validates, adjusts and saves the estimator configuration
#[derive(Debug, Default)]
pub struct ConfigurationManager {
    config: EstimatorConfig,
    config_file_path: Option<String>,
    is_modified: bool,
}

fn invalid(parameter: &str, value: f64, reason: &str) -> ConfigError {
    ConfigError::InvalidParameter {
        parameter: parameter.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

impl ConfigurationManager {
    /// Create a new configuration manager with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn get_config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Estimator built from the current distance proxy
    pub fn estimator(&self) -> WeightedPositionEstimator {
        // Every path that sets `config` runs validate_config first
        WeightedPositionEstimator::from_validated(self.config.distance_proxy)
    }

    /// Replace the whole configuration after validation
    pub fn update_config(&mut self, config: EstimatorConfig) -> Result<(), ConfigError> {
        Self::into_result(Self::validate_config(&config))?;
        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path_str.clone(),
            source,
        })?;

        let config: EstimatorConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Serialization {
                path: path_str.clone(),
                source,
            })?;

        Self::into_result(Self::validate_config(&config))?;

        info!(path = %path_str, "loaded estimator configuration");
        self.config = config;
        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save configuration to JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(&self.config).map_err(|source| {
            ConfigError::Serialization {
                path: path_str.clone(),
                source,
            }
        })?;

        fs::write(&path, content).map_err(|source| ConfigError::Io {
            path: path_str.clone(),
            source,
        })?;

        debug!(path = %path_str, "saved estimator configuration");
        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save to the currently loaded file path
    pub fn save(&mut self) -> Result<(), ConfigError> {
        match self.config_file_path.clone() {
            Some(path) => self.save_to_file(path),
            None => Err(ConfigError::NoPath),
        }
    }

    /// Check if configuration has been modified since last save
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    // Runtime parameter adjustment; each setter returns the previous value

    pub fn set_strong_rssi(&mut self, rssi_dbm: f64) -> Result<f64, ConfigError> {
        let mut proxy = self.config.distance_proxy;
        let old_value = proxy.strong_rssi_dbm;
        proxy.strong_rssi_dbm = rssi_dbm;
        self.apply_proxy(proxy)?;
        Ok(old_value)
    }

    pub fn set_weak_rssi(&mut self, rssi_dbm: f64) -> Result<f64, ConfigError> {
        let mut proxy = self.config.distance_proxy;
        let old_value = proxy.weak_rssi_dbm;
        proxy.weak_rssi_dbm = rssi_dbm;
        self.apply_proxy(proxy)?;
        Ok(old_value)
    }

    pub fn set_near_distance(&mut self, distance: f64) -> Result<f64, ConfigError> {
        let mut proxy = self.config.distance_proxy;
        let old_value = proxy.near_distance;
        proxy.near_distance = distance;
        self.apply_proxy(proxy)?;
        Ok(old_value)
    }

    pub fn set_far_distance(&mut self, distance: f64) -> Result<f64, ConfigError> {
        let mut proxy = self.config.distance_proxy;
        let old_value = proxy.far_distance;
        proxy.far_distance = distance;
        self.apply_proxy(proxy)?;
        Ok(old_value)
    }

    pub fn set_debug_logging(&mut self, enabled: bool) -> bool {
        let old_value = self.config.debug_logging;
        self.config.debug_logging = enabled;
        self.is_modified = true;
        old_value
    }

    fn apply_proxy(&mut self, proxy: DistanceProxy) -> Result<(), ConfigError> {
        let candidate = EstimatorConfig {
            distance_proxy: proxy,
            ..self.config.clone()
        };
        Self::into_result(Self::validate_config(&candidate))?;
        self.config = candidate;
        self.is_modified = true;
        Ok(())
    }

    fn into_result(validation: ValidationResult) -> Result<(), ConfigError> {
        for warning in &validation.warnings {
            warn!("{}", warning);
        }
        match validation.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Check the distance proxy for values the estimator cannot use
    pub fn validate_config(config: &EstimatorConfig) -> ValidationResult {
        let mut result = ValidationResult::default();
        let proxy = &config.distance_proxy;

        if let Err(err) = proxy.validate() {
            result.errors.push(match err {
                EstimationError::InvalidProxy { parameter, value, reason } => invalid(parameter, value, reason),
                other => ConfigError::InvalidParameter {
                    parameter: "distance_proxy".to_string(),
                    value: format!("{:?}", proxy),
                    reason: other.to_string(),
                },
            });
        }

        if result.is_valid() {
            let span = proxy.linear_span();
            if proxy.near_distance > span {
                result.warnings.push(format!(
                    "near_distance {} exceeds the linear segment span {}; strong signals will weigh less than moderate ones",
                    proxy.near_distance, span
                ));
            }
            if proxy.far_distance < span {
                result.warnings.push(format!(
                    "far_distance {} is below the linear segment span {}; weak signals will weigh more than moderate ones",
                    proxy.far_distance, span
                ));
            }
        }

        result
    }
}
