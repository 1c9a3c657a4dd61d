//! RSSI-weighted centroid position estimation
//!
//! Each gateway that heard a node pulls the estimate toward itself with a weight
//! derived from the received signal strength. RSSI does not map linearly to
//! distance, so a three-segment piecewise "distance proxy" is used instead of a
//! path-loss model:
//!
//! - signals at or below the weak breakpoint count as uniformly far,
//! - signals at or above the strong breakpoint count as uniformly near,
//! - signals in between grow linearly with the drop below the strong breakpoint.
//!
//! The breakpoints are empirical tuning values, not a calibrated physical model.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{
    EstimatedPosition, GatewayObservation, DEFAULT_FAR_DISTANCE, DEFAULT_NEAR_DISTANCE,
    DEFAULT_STRONG_RSSI_DBM, DEFAULT_WEAK_RSSI_DBM,
};
use crate::validation::error::{EstimationError, EstimationResult};

/// Piecewise RSSI to distance-proxy mapping
///
/// Deserialization runs [`DistanceProxy::validate`], so a proxy read from a
/// file always yields finite, positive distances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DistanceProxyFields")]
pub struct DistanceProxy {
    /// RSSI (dBm) at or above which the near distance applies
    pub strong_rssi_dbm: f64,
    /// RSSI (dBm) at or below which the far distance applies
    pub weak_rssi_dbm: f64,
    /// Proxy distance for strong signals
    pub near_distance: f64,
    /// Proxy distance for weak signals
    pub far_distance: f64,
}

#[derive(Deserialize)]
struct DistanceProxyFields {
    strong_rssi_dbm: f64,
    weak_rssi_dbm: f64,
    near_distance: f64,
    far_distance: f64,
}

impl TryFrom<DistanceProxyFields> for DistanceProxy {
    type Error = EstimationError;

    fn try_from(fields: DistanceProxyFields) -> Result<Self, Self::Error> {
        let proxy = DistanceProxy {
            strong_rssi_dbm: fields.strong_rssi_dbm,
            weak_rssi_dbm: fields.weak_rssi_dbm,
            near_distance: fields.near_distance,
            far_distance: fields.far_distance,
        };
        proxy.validate()?;
        Ok(proxy)
    }
}

fn invalid(parameter: &'static str, value: f64, reason: &'static str) -> EstimationResult<()> {
    Err(EstimationError::InvalidProxy { parameter, value, reason })
}

impl Default for DistanceProxy {
    fn default() -> Self {
        Self {
            strong_rssi_dbm: DEFAULT_STRONG_RSSI_DBM,
            weak_rssi_dbm: DEFAULT_WEAK_RSSI_DBM,
            near_distance: DEFAULT_NEAR_DISTANCE,
            far_distance: DEFAULT_FAR_DISTANCE,
        }
    }
}

impl DistanceProxy {
    /// Unitless distance stand-in for an RSSI reading
    pub fn distance(&self, rssi: f64) -> f64 {
        if rssi <= self.weak_rssi_dbm {
            self.far_distance
        } else if rssi < self.strong_rssi_dbm {
            self.strong_rssi_dbm - rssi
        } else {
            self.near_distance
        }
    }

    /// Check that every distance this proxy can return is finite and positive.
    ///
    /// Requires finite breakpoints with `weak < strong` (so the linear segment
    /// yields `(0, strong - weak)`) and finite positive cap distances.
    pub fn validate(&self) -> EstimationResult<()> {
        if !self.strong_rssi_dbm.is_finite() {
            return invalid("strong_rssi_dbm", self.strong_rssi_dbm, "must be finite");
        }
        if !self.weak_rssi_dbm.is_finite() {
            return invalid("weak_rssi_dbm", self.weak_rssi_dbm, "must be finite");
        }
        if self.weak_rssi_dbm >= self.strong_rssi_dbm {
            return invalid("weak_rssi_dbm", self.weak_rssi_dbm, "must be below strong_rssi_dbm");
        }
        for (parameter, value) in [("near_distance", self.near_distance), ("far_distance", self.far_distance)] {
            if !(value.is_finite() && value > 0.0) {
                return invalid(parameter, value, "must be finite and positive");
            }
        }
        Ok(())
    }

    /// Width of the linear segment between the two breakpoints
    pub fn linear_span(&self) -> f64 {
        self.strong_rssi_dbm - self.weak_rssi_dbm
    }
}

/// Per-call details of a multi-gateway estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateDiagnostics {
    /// Number of observations used
    pub gateway_count: usize,
    /// Weight assigned to each observation, in input order
    pub weights: Vec<f64>,
    /// Sum of all weights (the centroid denominator)
    pub weight_sum: f64,
    /// Index of the observation with the largest weight (first on ties)
    pub strongest_index: usize,
}

/// Weighted centroid estimator over gateway RSSI observations
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightedPositionEstimator {
    proxy: DistanceProxy,
}

impl WeightedPositionEstimator {
    /// Estimator with the default breakpoints (-70 / -100 dBm, distances 1 / 100)
    pub fn new() -> Self {
        Self::default()
    }

    /// Estimator with a custom proxy; rejects proxies that fail [`DistanceProxy::validate`]
    pub fn with_proxy(proxy: DistanceProxy) -> EstimationResult<Self> {
        proxy.validate()?;
        Ok(Self { proxy })
    }

    /// Caller guarantees `proxy` has already passed validation
    pub(crate) fn from_validated(proxy: DistanceProxy) -> Self {
        Self { proxy }
    }

    pub fn proxy(&self) -> &DistanceProxy {
        &self.proxy
    }

    pub fn distance_proxy(&self, rssi: f64) -> f64 {
        self.proxy.distance(rssi)
    }

    pub fn weight(&self, rssi: f64) -> f64 {
        1.0 / self.proxy.distance(rssi)
    }

    /// Estimate the transmitting node's position.
    ///
    /// A single observation is returned as-is. Two or more produce the
    /// weighted centroid `Σ(w·p) / Σw`. Fails only on an empty slice.
    pub fn estimate(&self, observations: &[GatewayObservation]) -> EstimationResult<EstimatedPosition> {
        self.estimate_with_diagnostics(observations)
            .map(|(position, _)| position)
    }

    /// Same as [`estimate`](Self::estimate), also returning the weights used
    pub fn estimate_with_diagnostics(
        &self,
        observations: &[GatewayObservation],
    ) -> EstimationResult<(EstimatedPosition, EstimateDiagnostics)> {
        let first = observations.first().ok_or_else(EstimationError::no_observations)?;

        let weights: Vec<f64> = observations
            .iter()
            .map(|obs| {
                if obs.rssi > 0.0 {
                    warn!(rssi = obs.rssi, "positive RSSI accepted as strong signal");
                }
                self.weight(obs.rssi)
            })
            .collect();

        let mut strongest_index = 0;
        for (i, w) in weights.iter().enumerate() {
            if *w > weights[strongest_index] {
                strongest_index = i;
            }
        }

        if observations.len() == 1 {
            let diagnostics = EstimateDiagnostics {
                gateway_count: 1,
                weight_sum: weights[0],
                weights,
                strongest_index,
            };
            return Ok((EstimatedPosition::from_observation(first), diagnostics));
        }

        let mut weighted_sum = Vector2::<f64>::zeros();
        let mut weight_sum = 0.0;
        for (obs, w) in observations.iter().zip(&weights) {
            weighted_sum += Vector2::new(obs.latitude, obs.longitude) * *w;
            weight_sum += *w;
        }
        let centroid = weighted_sum / weight_sum;

        debug!(
            gateways = observations.len(),
            weight_sum,
            latitude = centroid.x,
            longitude = centroid.y,
            "weighted centroid estimate"
        );

        let diagnostics = EstimateDiagnostics {
            gateway_count: observations.len(),
            weights,
            weight_sum,
            strongest_index,
        };
        Ok((EstimatedPosition::new(centroid.x, centroid.y), diagnostics))
    }
}

/// Estimate with the default distance proxy
pub fn estimate(observations: &[GatewayObservation]) -> EstimationResult<EstimatedPosition> {
    WeightedPositionEstimator::new().estimate(observations)
}
