//! Error types for return stream construction and algebra.

use stylefit_primitives::{Date, PrimitivesError};

/// Errors raised by malformed streams or date lists.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StreamError {
    /// Invalid primitive input.
    #[error("primitives error: {0}")]
    Primitives(#[from] PrimitivesError),

    /// Parallel sequences have different lengths.
    #[error(
        "length mismatch: {start_dates} start dates, {end_dates} end dates, {returns} returns"
    )]
    LengthMismatch {
        /// Number of start dates.
        start_dates: usize,
        /// Number of end dates.
        end_dates: usize,
        /// Number of returns.
        returns: usize,
    },

    /// A return period does not end after it starts.
    #[error("return {index} starts on {start} but ends on {end}")]
    InvertedPeriod {
        /// Index of the offending return.
        index: usize,
        /// Start date.
        start: Date,
        /// End date.
        end: Date,
    },

    /// Start dates go backwards.
    #[error("start date {current} at index {index} precedes {previous}")]
    UnorderedStarts {
        /// Index of the offending start date.
        index: usize,
        /// Start date before the offending one.
        previous: Date,
        /// Offending start date.
        current: Date,
    },

    /// A requested bucket boundary is not one of the stream's end dates.
    #[error("{0} is not an end date of the stream")]
    UnknownDate(Date),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let date = Date::from_ymd_opt(2024, 1, 3).unwrap();
        let err = StreamError::UnknownDate(date);
        assert_eq!(err.to_string(), "2024-01-03 is not an end date of the stream");

        let err = StreamError::LengthMismatch { start_dates: 3, end_dates: 3, returns: 2 };
        assert!(err.to_string().contains("2 returns"));
    }

    #[test]
    fn converts_primitives_error() {
        let err: StreamError = PrimitivesError::LengthMismatch { dates: 2, values: 1 }.into();
        assert!(matches!(err, StreamError::Primitives(_)));
    }
}
