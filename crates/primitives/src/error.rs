//! Error types for primitive construction.

use crate::Date;

/// Errors raised when a primitive is built from malformed input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PrimitivesError {
    /// Parallel sequences have different lengths.
    #[error("length mismatch: {dates} dates but {values} values")]
    LengthMismatch {
        /// Number of dates.
        dates: usize,
        /// Number of values.
        values: usize,
    },

    /// Dates are not strictly increasing.
    #[error("dates must be strictly increasing: {current} at index {index} follows {previous}")]
    NonMonotonicDates {
        /// Index of the offending date.
        index: usize,
        /// Date before the offending one.
        previous: Date,
        /// Offending date.
        current: Date,
    },

    /// A weight lies outside [0, 1] or is not finite.
    #[error("weight for {factor} out of range: {weight}")]
    InvalidWeight {
        /// Factor name.
        factor: String,
        /// Offending weight.
        weight: f64,
    },

    /// A date window ends before it starts.
    #[error("invalid window: {start} is after {end}")]
    InvalidWindow {
        /// Window start.
        start: Date,
        /// Window end.
        end: Date,
    },
}
