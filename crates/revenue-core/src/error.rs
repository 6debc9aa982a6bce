//! Error types for chart input handling

use thiserror::Error;

/// Problems with chart configuration detected at the component boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartConfigError {
    #[error("duplicate series id `{0}`")]
    DuplicateSeriesId(String),
    #[error("series `{id}` has non-hex color `{color}`")]
    InvalidColor { id: String, color: String },
    #[error("grid line count must be at least 1")]
    ZeroGridLines,
    #[error("grid line count {requested} exceeds the maximum of {max}")]
    TooManyGridLines { requested: usize, max: usize },
}

/// Failures loading a chart payload
#[derive(Debug, Error)]
pub enum ChartDataError {
    #[error("malformed chart payload: {0}")]
    Parse(#[from] serde_json::Error),
}
