//! Error types for mathematical operations.

/// Errors that can occur during mathematical operations.
#[derive(Debug, thiserror::Error)]
pub enum MathError {
    /// Dimension mismatch.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// Linear algebra error.
    #[error("linear algebra error: {0}")]
    LinearAlgebra(String),

    /// Empty data.
    #[error("empty data provided")]
    EmptyData,

    /// Numerical instability (NaN or Inf).
    #[error("numerical instability: {0}")]
    NumericalInstability(String),

    /// Invalid solver configuration.
    #[error("invalid solver configuration: {0}")]
    InvalidConfig(String),
}
