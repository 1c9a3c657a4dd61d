//! Positioning and lookup algorithms

pub mod sorted_search;
pub mod weighted_centroid;

pub use sorted_search::{contains, SortedKeys};
pub use weighted_centroid::{estimate, DistanceProxy, EstimateDiagnostics, WeightedPositionEstimator};
