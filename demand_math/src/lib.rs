//! # Demand Math
//!
//! Numeric building blocks for seasonal time series models.
//! This crate provides lag polynomial arithmetic, seasonal differencing
//! and a derivative-free minimiser used to estimate model parameters.

use thiserror::Error;

pub mod differencing;
pub mod optimize;
pub mod polynomial;

pub use differencing::{difference, integrate};
pub use optimize::{Minimum, NelderMead};
pub use polynomial::LagPolynomial;

/// Errors that can occur in numeric routines
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numeric operations
pub type Result<T> = std::result::Result<T, MathError>;
