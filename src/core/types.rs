//! Core data types for gateway-based positioning

use serde::{Deserialize, Serialize};

/// A single gateway's reception of a node's transmission
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GatewayObservation {
    /// Gateway latitude in decimal degrees
    pub latitude: f64,
    /// Gateway longitude in decimal degrees
    pub longitude: f64,
    /// Received signal strength in dBm
    pub rssi: f64,
}

impl GatewayObservation {
    pub fn new(latitude: f64, longitude: f64, rssi: f64) -> Self {
        Self { latitude, longitude, rssi }
    }
}

/// Estimated node position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatedPosition {
    pub latitude: f64,
    pub longitude: f64,
}

impl EstimatedPosition {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Position of the gateway itself, copied without any arithmetic
    pub fn from_observation(observation: &GatewayObservation) -> Self {
        Self {
            latitude: observation.latitude,
            longitude: observation.longitude,
        }
    }

    /// Whether this position lies inside the lat/lon bounding box of the observations.
    ///
    /// `tolerance` widens the box on every side to absorb floating-point rounding.
    /// An empty observation set has no box and always yields `false`.
    pub fn bounding_box_contains(&self, observations: &[GatewayObservation], tolerance: f64) -> bool {
        if observations.is_empty() {
            return false;
        }

        let (mut min_lat, mut max_lat) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_lon, mut max_lon) = (f64::INFINITY, f64::NEG_INFINITY);
        for obs in observations {
            min_lat = min_lat.min(obs.latitude);
            max_lat = max_lat.max(obs.latitude);
            min_lon = min_lon.min(obs.longitude);
            max_lon = max_lon.max(obs.longitude);
        }

        self.latitude >= min_lat - tolerance
            && self.latitude <= max_lat + tolerance
            && self.longitude >= min_lon - tolerance
            && self.longitude <= max_lon + tolerance
    }
}
