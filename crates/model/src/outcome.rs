//! Explicit "no result" values for sparse or unmapped data.

use std::fmt;

/// Why an analysis produced no result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoResult {
    /// Too few common dates between the fund and its benchmarks.
    InsufficientOverlap {
        /// Aligned observations found.
        observations: usize,
        /// Observations required.
        required: usize,
    },
    /// Statistics were requested for a fund with no style mapping.
    UndefinedMapping,
}

impl fmt::Display for NoResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientOverlap { observations, required } => {
                write!(f, "insufficient overlap: {observations} aligned dates, need {required}")
            }
            Self::UndefinedMapping => write!(f, "no style mapping defined"),
        }
    }
}

/// Either a computed value or the reason none exists.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The computation ran.
    Ready(T),
    /// The data did not support the computation.
    NoResult(NoResult),
}

impl<T> Outcome<T> {
    /// Check if a value was produced.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Borrow the value, if any.
    #[must_use]
    pub const fn as_ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::NoResult(_) => None,
        }
    }

    /// The value, discarding the reason it may be missing.
    #[must_use]
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::NoResult(_) => None,
        }
    }

    /// The reason no value was produced, if any.
    #[must_use]
    pub const fn reason(&self) -> Option<NoResult> {
        match self {
            Self::Ready(_) => None,
            Self::NoResult(reason) => Some(*reason),
        }
    }

    /// Transform the value, keeping any reason unchanged.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Ready(value) => Outcome::Ready(f(value)),
            Self::NoResult(reason) => Outcome::NoResult(reason),
        }
    }
}

impl<T> From<NoResult> for Outcome<T> {
    fn from(reason: NoResult) -> Self {
        Self::NoResult(reason)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn outcome_accessors() {
        let ready: Outcome<u32> = Outcome::Ready(3);
        assert!(ready.is_ready());
        assert_eq!(ready.as_ready(), Some(&3));
        assert_eq!(ready.map(|v| v * 2).ready(), Some(6));

        let missing: Outcome<u32> = NoResult::UndefinedMapping.into();
        assert!(!missing.is_ready());
        assert_eq!(missing.reason(), Some(NoResult::UndefinedMapping));
        assert_eq!(missing.ready(), None);
    }

    #[rstest]
    #[case(
        NoResult::InsufficientOverlap { observations: 2, required: 3 },
        "insufficient overlap: 2 aligned dates, need 3"
    )]
    #[case(NoResult::UndefinedMapping, "no style mapping defined")]
    fn no_result_display(#[case] reason: NoResult, #[case] expected: &str) {
        assert_eq!(reason.to_string(), expected);
    }
}
