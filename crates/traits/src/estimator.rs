//! Style weight estimation trait definitions.

use ndarray::{Array1, Array2};

/// Errors that can occur during estimation.
#[derive(Debug, thiserror::Error)]
pub enum EstimatorError {
    /// Dimension mismatch in input data.
    #[error("dimension mismatch for {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
        /// Context description.
        context: String,
    },

    /// Insufficient data for estimation.
    #[error("insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Required number of observations.
        required: usize,
        /// Actual number of observations.
        actual: usize,
    },

    /// The factor matrix has no columns.
    #[error("no benchmark factors to regress against")]
    NoFactors,

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Linear algebra or solver error.
    #[error("linear algebra error: {0}")]
    LinearAlgebra(String),
}

impl EstimatorError {
    /// Returns whether this error is recoverable.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}

/// Trait for estimating style weights of a fund against benchmark factors.
pub trait StyleEstimator: Send + Sync {
    /// Configuration type for this estimator.
    type Config: Default + Clone + Send + Sync;

    /// Create a new estimator with the given configuration.
    fn with_config(config: Self::Config) -> Self;

    /// Estimate factor weights for aligned observations.
    ///
    /// # Arguments
    /// * `fund` - Fund returns (n_obs,)
    /// * `factors` - Benchmark returns (n_obs x n_factors)
    ///
    /// # Returns
    /// Tuple of (weights, residuals)
    ///
    /// # Errors
    /// Returns `EstimatorError` if dimensions mismatch or computation fails.
    fn estimate(
        &self,
        fund: &Array1<f64>,
        factors: &Array2<f64>,
    ) -> Result<(Array1<f64>, Array1<f64>), EstimatorError>;
}
