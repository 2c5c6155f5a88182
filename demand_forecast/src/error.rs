//! Error types for the demand_forecast crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the demand_forecast crate
#[derive(Debug, Error)]
pub enum DemandError {
    /// Input table is missing required columns or holds unparseable values
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The seasonal model could not be estimated from the series
    #[error("Estimation error: {0}")]
    EstimationError(String),

    /// A user-supplied planning input was rejected
    #[error("Input validation error: {0}")]
    InputValidationError(String),

    /// Configuration file or value is invalid
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error writing CSV output
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error reading or writing JSON
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, DemandError>;

impl From<PolarsError> for DemandError {
    fn from(err: PolarsError) -> Self {
        DemandError::PolarsError(err.to_string())
    }
}

impl From<demand_math::MathError> for DemandError {
    fn from(err: demand_math::MathError) -> Self {
        DemandError::EstimationError(err.to_string())
    }
}

impl DemandError {
    /// Short category label used when reporting the failure to the user
    pub fn category(&self) -> &'static str {
        match self {
            DemandError::ParseError(_) | DemandError::PolarsError(_) => "parse",
            DemandError::EstimationError(_) => "estimation",
            DemandError::InputValidationError(_) => "input",
            DemandError::ConfigError(_) => "config",
            DemandError::IoError(_) | DemandError::CsvError(_) | DemandError::JsonError(_) => "io",
        }
    }
}
