//! Owned return streams.

use ndarray::Array1;
use stylefit_primitives::{Date, ensure_increasing};
use stylefit_traits::ReturnSeries;

use crate::StreamError;

/// A time series of fractional returns, each tagged with a start and end date.
///
/// End dates are strictly increasing, start dates never decrease, and every
/// return period ends after it starts. The stream owns its sequences.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReturnStream {
    start_dates: Vec<Date>,
    end_dates: Vec<Date>,
    returns: Array1<f64>,
}

impl ReturnStream {
    /// Create a stream from parallel sequences.
    ///
    /// # Errors
    /// Returns an error if the lengths differ, end dates are not strictly
    /// increasing, start dates go backwards, or a period ends on or before
    /// its start.
    pub fn new(
        start_dates: Vec<Date>,
        end_dates: Vec<Date>,
        returns: impl Into<Array1<f64>>,
    ) -> Result<Self, StreamError> {
        let returns = returns.into();
        if start_dates.len() != end_dates.len() || end_dates.len() != returns.len() {
            return Err(StreamError::LengthMismatch {
                start_dates: start_dates.len(),
                end_dates: end_dates.len(),
                returns: returns.len(),
            });
        }
        ensure_increasing(&end_dates)?;

        for (index, pair) in start_dates.windows(2).enumerate() {
            if pair[1] < pair[0] {
                return Err(StreamError::UnorderedStarts {
                    index: index + 1,
                    previous: pair[0],
                    current: pair[1],
                });
            }
        }
        if let Some(index) = start_dates.iter().zip(&end_dates).position(|(s, e)| s >= e) {
            return Err(StreamError::InvertedPeriod {
                index,
                start: start_dates[index],
                end: end_dates[index],
            });
        }

        Ok(Self { start_dates, end_dates, returns })
    }

    /// A stream with no returns.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from sequences already known to satisfy the stream invariants.
    pub(crate) const fn from_parts(
        start_dates: Vec<Date>,
        end_dates: Vec<Date>,
        returns: Array1<f64>,
    ) -> Self {
        Self { start_dates, end_dates, returns }
    }

    /// Iterate over `(start, end, return)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (Date, Date, f64)> + '_ {
        self.start_dates
            .iter()
            .zip(&self.end_dates)
            .zip(self.returns.iter())
            .map(|((&s, &e), &r)| (s, e, r))
    }

    /// Consume the stream, returning its sequences.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Date>, Vec<Date>, Array1<f64>) {
        (self.start_dates, self.end_dates, self.returns)
    }
}

impl ReturnSeries for ReturnStream {
    fn start_dates(&self) -> &[Date] {
        &self.start_dates
    }

    fn end_dates(&self) -> &[Date] {
        &self.end_dates
    }

    fn returns(&self) -> &Array1<f64> {
        &self.returns
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn valid_stream() {
        let stream =
            ReturnStream::new(vec![d(1), d(2)], vec![d(2), d(3)], array![0.01, -0.02]).unwrap();
        assert_eq!(stream.len(), 2);
        assert_eq!(stream.value_at(d(3)), Some(-0.02));
        assert_eq!(stream.value_at(d(1)), None);
        assert_eq!(stream.first_date(), Some(d(1)));
        assert_eq!(stream.last_date(), Some(d(3)));
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = ReturnStream::new(vec![d(1)], vec![d(2), d(3)], vec![0.01, 0.02]).unwrap_err();
        assert!(matches!(err, StreamError::LengthMismatch { .. }));
    }

    #[test]
    fn rejects_duplicate_end_dates() {
        let err =
            ReturnStream::new(vec![d(1), d(1)], vec![d(2), d(2)], vec![0.01, 0.02]).unwrap_err();
        assert!(matches!(err, StreamError::Primitives(_)));
    }

    #[test]
    fn rejects_inverted_period() {
        let err = ReturnStream::new(vec![d(3)], vec![d(2)], vec![0.01]).unwrap_err();
        assert!(matches!(err, StreamError::InvertedPeriod { index: 0, .. }));
    }

    #[test]
    fn rejects_backwards_starts() {
        let err =
            ReturnStream::new(vec![d(2), d(1)], vec![d(3), d(4)], vec![0.01, 0.02]).unwrap_err();
        assert!(matches!(err, StreamError::UnorderedStarts { index: 1, .. }));
    }

    #[test]
    fn empty_stream() {
        let stream = ReturnStream::empty();
        assert!(stream.is_empty());
        assert_eq!(stream.last_date(), None);
    }
}
