//! Error types for utility functions.

use stylefit_primitives::PrimitivesError;

/// Errors that can occur during utility operations.
#[derive(Debug, thiserror::Error)]
pub enum UtilsError {
    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// The frame does not describe a valid quote series.
    #[error("invalid quotes: {0}")]
    Quotes(#[from] PrimitivesError),

    /// Missing column.
    #[error("missing column: {0}")]
    MissingColumn(String),
}
