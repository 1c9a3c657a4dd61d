//! Empirical RSSI breakpoints for the distance proxy

/// RSSI (dBm) at or above which a gateway is treated as "near"
pub const DEFAULT_STRONG_RSSI_DBM: f64 = -70.0;

/// RSSI (dBm) at or below which a gateway is treated as "far"
pub const DEFAULT_WEAK_RSSI_DBM: f64 = -100.0;

/// Distance proxy assigned to strong signals
pub const DEFAULT_NEAR_DISTANCE: f64 = 1.0;

/// Distance proxy assigned to weak signals
pub const DEFAULT_FAR_DISTANCE: f64 = 100.0;
