//! Output formatting for estimates

pub mod formatting;

pub use formatting::{
    CsvFormatter, FormattedPosition, JsonFormatter, OutputFormat, PositionFormatter, TextFormatter,
};
