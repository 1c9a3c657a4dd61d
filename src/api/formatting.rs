//! Position output formatting
//!
//! Human-readable, JSON and CSV renderings of an estimate. Rounding happens
//! here only; estimates themselves are never rounded.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::algorithms::weighted_centroid::EstimateDiagnostics;
use crate::core::EstimatedPosition;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Estimate plus the quality figures worth showing next to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedPosition {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub gateway_count: usize,
    /// Index of the gateway with the strongest pull
    pub strongest_gateway: usize,
    /// Share of the total weight held by the strongest gateway (0..=1)
    pub strongest_share: f64,
}

/// Decimal places beyond this are below f64 resolution for coordinates
pub const MAX_PRECISION: u8 = 15;

/// Builds [`FormattedPosition`] values at a fixed decimal precision
pub struct PositionFormatter {
    /// Decimal places kept for coordinates, capped at [`MAX_PRECISION`]
    pub precision: u8,
}

impl Default for PositionFormatter {
    fn default() -> Self {
        Self { precision: 6 }
    }
}

impl PositionFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = precision.min(MAX_PRECISION);
        self
    }

    pub fn format(&self, position: &EstimatedPosition, diagnostics: &EstimateDiagnostics) -> FormattedPosition {
        let strongest = diagnostics
            .weights
            .get(diagnostics.strongest_index)
            .copied()
            .unwrap_or(0.0);
        let strongest_share = if diagnostics.weight_sum > 0.0 {
            strongest / diagnostics.weight_sum
        } else {
            0.0
        };

        FormattedPosition {
            latitude_deg: self.round_to_precision(position.latitude),
            longitude_deg: self.round_to_precision(position.longitude),
            gateway_count: diagnostics.gateway_count,
            strongest_gateway: diagnostics.strongest_index,
            strongest_share,
        }
    }

    fn round_to_precision(&self, value: f64) -> f64 {
        let multiplier = 10_f64.powi(self.precision.min(MAX_PRECISION) as i32);
        (value * multiplier).round() / multiplier
    }
}

/// Human-readable text formatter
#[derive(Default)]
pub struct TextFormatter {
    /// Single-line output
    pub compact: bool,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format_text(&self, pos: &FormattedPosition) -> String {
        if self.compact {
            return format!(
                "Pos: {}°, {}° | Gw:{}, Top:#{} ({:.0}%)",
                pos.latitude_deg,
                pos.longitude_deg,
                pos.gateway_count,
                pos.strongest_gateway,
                pos.strongest_share * 100.0
            );
        }

        let mut output = String::new();
        output.push_str("Estimated position:\n");
        output.push_str(&format!("  Latitude:  {}°\n", pos.latitude_deg));
        output.push_str(&format!("  Longitude: {}°\n", pos.longitude_deg));
        output.push_str(&format!("  Gateways:  {}\n", pos.gateway_count));
        output.push_str(&format!(
            "  Strongest: #{} ({:.1}% of total weight)\n",
            pos.strongest_gateway,
            pos.strongest_share * 100.0
        ));
        output
    }
}

/// JSON formatter for structured output
#[derive(Default)]
pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn format_json(&self, pos: &FormattedPosition) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(pos)
        } else {
            serde_json::to_string(pos)
        }
    }
}

/// CSV formatter for data logging
pub struct CsvFormatter {
    pub include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self { include_header: true }
    }
}

impl CsvFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self) -> String {
        "latitude,longitude,gateway_count,strongest_gateway,strongest_share".to_string()
    }

    pub fn format_csv(&self, pos: &FormattedPosition) -> String {
        let row = format!(
            "{},{},{},{},{:.4}",
            pos.latitude_deg, pos.longitude_deg, pos.gateway_count, pos.strongest_gateway, pos.strongest_share
        );
        if self.include_header {
            format!("{}\n{}", self.header(), row)
        } else {
            row
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::weighted_centroid::WeightedPositionEstimator;
    use crate::core::GatewayObservation;

    fn sample() -> FormattedPosition {
        let gateways = [
            GatewayObservation::new(51.05, -114.07, -65.0),
            GatewayObservation::new(51.06, -114.06, -95.0),
        ];
        let (pos, diag) = WeightedPositionEstimator::new()
            .estimate_with_diagnostics(&gateways)
            .unwrap();
        PositionFormatter::new().with_precision(4).format(&pos, &diag)
    }

    #[test]
    fn test_precision_and_share() {
        let pos = sample();
        assert_eq!(pos.latitude_deg, 51.0504);
        assert_eq!(pos.longitude_deg, -114.0696);
        assert_eq!(pos.gateway_count, 2);
        assert_eq!(pos.strongest_gateway, 0);
        assert!((pos.strongest_share - 1.0 / 1.04).abs() < 1e-12);
    }

    #[test]
    fn test_precision_is_clamped() {
        let gateways = [GatewayObservation::new(51.05, -114.07, -65.0)];
        let (pos, diag) = WeightedPositionEstimator::new()
            .estimate_with_diagnostics(&gateways)
            .unwrap();

        let formatter = PositionFormatter::new().with_precision(255);
        assert_eq!(formatter.precision, MAX_PRECISION);
        let formatted = formatter.format(&pos, &diag);
        assert!(formatted.latitude_deg.is_finite());
        assert!((formatted.latitude_deg - 51.05).abs() < 1e-12);
        assert!((formatted.longitude_deg + 114.07).abs() < 1e-12);

        // the field is public, so rounding clamps as well
        let unchecked = PositionFormatter { precision: 200 }.format(&pos, &diag);
        assert!(unchecked.longitude_deg.is_finite());
        assert!((unchecked.longitude_deg + 114.07).abs() < 1e-12);
    }

    #[test]
    fn test_text_output() {
        let text = TextFormatter::new().format_text(&sample());
        assert!(text.contains("Latitude:  51.0504°"));
        assert!(text.contains("Gateways:  2"));

        let compact = TextFormatter { compact: true }.format_text(&sample());
        assert!(!compact.contains('\n'));
        assert!(compact.starts_with("Pos: 51.0504°"));
    }

    #[test]
    fn test_json_output() {
        let json = JsonFormatter::new().format_json(&sample()).unwrap();
        let back: FormattedPosition = serde_json::from_str(&json).unwrap();
        let original = sample();
        assert!((back.latitude_deg - original.latitude_deg).abs() < 1e-12);
        assert!((back.longitude_deg - original.longitude_deg).abs() < 1e-12);
        assert!((back.strongest_share - original.strongest_share).abs() < 1e-12);
        assert_eq!(back.gateway_count, 2);
        assert!(json.contains("\"strongest_gateway\":0"));
    }

    #[test]
    fn test_csv_output() {
        let csv = CsvFormatter::new().format_csv(&sample());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], CsvFormatter::new().header());
        assert!(lines[1].starts_with("51.0504,-114.0696,2,0,0.96"));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("csv".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert!("xml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Text.to_string(), "text");
    }
}
