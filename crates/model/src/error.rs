//! Error types for style analysis.

use stylefit_math::MathError;
use stylefit_primitives::PrimitivesError;
use stylefit_streams::StreamError;
use stylefit_traits::{EstimatorError, LookupError};

/// Errors that can occur during style analysis.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Estimator error.
    #[error("estimator error: {0}")]
    Estimator(#[from] EstimatorError),

    /// Math error.
    #[error("math error: {0}")]
    Math(#[from] MathError),

    /// Malformed stream or date list.
    #[error("stream error: {0}")]
    Stream(#[from] StreamError),

    /// Malformed primitive input.
    #[error("invalid input: {0}")]
    Primitives(#[from] PrimitivesError),

    /// External valuation lookup failed.
    #[error("valuation lookup failed: {0}")]
    Lookup(#[from] LookupError),

    /// Polars error.
    #[error("data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// The basket holds no benchmark streams.
    #[error("benchmark basket is empty")]
    EmptyBasket,

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Dimension mismatch.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
}

impl ModelError {
    /// Returns whether a batch may skip the item and continue.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Lookup(err) => err.is_recoverable(),
            Self::Estimator(err) => err.is_recoverable(),
            _ => false,
        }
    }
}
