//! Dated quote series.

use serde::{Deserialize, Deserializer, Serialize, de};

use crate::{Date, PrimitivesError};

/// Check that a date sequence is strictly increasing.
///
/// # Errors
/// Returns `PrimitivesError::NonMonotonicDates` at the first date that does
/// not follow its predecessor.
pub fn ensure_increasing(dates: &[Date]) -> Result<(), PrimitivesError> {
    for (index, pair) in dates.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(PrimitivesError::NonMonotonicDates {
                index: index + 1,
                previous: pair[0],
                current: pair[1],
            });
        }
    }
    Ok(())
}

/// An ordered sequence of (date, price) pairs, one quote per date.
///
/// Dates need not be contiguous; weekends and holidays are simply absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteSeries {
    dates: Vec<Date>,
    quotes: Vec<f64>,
}

impl<'de> Deserialize<'de> for QuoteSeries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            dates: Vec<Date>,
            quotes: Vec<f64>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.dates, raw.quotes).map_err(de::Error::custom)
    }
}

impl QuoteSeries {
    /// Create a quote series.
    ///
    /// # Errors
    /// Returns an error if the lengths differ or the dates are not strictly
    /// increasing.
    pub fn new(dates: Vec<Date>, quotes: Vec<f64>) -> Result<Self, PrimitivesError> {
        if dates.len() != quotes.len() {
            return Err(PrimitivesError::LengthMismatch {
                dates: dates.len(),
                values: quotes.len(),
            });
        }
        ensure_increasing(&dates)?;
        Ok(Self { dates, quotes })
    }

    /// Create a quote series from (date, quote) pairs.
    ///
    /// # Errors
    /// Returns an error if the dates are not strictly increasing.
    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (Date, f64)>,
    ) -> Result<Self, PrimitivesError> {
        let (dates, quotes): (Vec<Date>, Vec<f64>) = pairs.into_iter().unzip();
        Self::new(dates, quotes)
    }

    /// Quote dates.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Quote values.
    #[must_use]
    pub fn quotes(&self) -> &[f64] {
        &self.quotes
    }

    /// Number of quotes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Quote on an exact date, if one was observed.
    #[must_use]
    pub fn quote_on(&self, date: Date) -> Option<f64> {
        self.dates.binary_search(&date).ok().map(|i| self.quotes[i])
    }

    /// Iterate over (date, quote) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Date, f64)> + '_ {
        self.dates.iter().copied().zip(self.quotes.iter().copied())
    }

    /// Split into the underlying date and quote vectors.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Date>, Vec<f64>) {
        (self.dates, self.quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn quote_series_lookup() {
        let series = QuoteSeries::new(vec![d(2), d(3), d(5)], vec![10.0, 11.0, 12.0]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.quote_on(d(3)), Some(11.0));
        assert_eq!(series.quote_on(d(4)), None);
    }

    #[test]
    fn quote_series_rejects_length_mismatch() {
        let err = QuoteSeries::new(vec![d(2), d(3)], vec![1.0]).unwrap_err();
        assert_eq!(err, PrimitivesError::LengthMismatch { dates: 2, values: 1 });
    }

    #[test]
    fn quote_series_rejects_unsorted_dates() {
        let err = QuoteSeries::new(vec![d(2), d(5), d(4)], vec![1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, PrimitivesError::NonMonotonicDates { index: 2, .. }));
    }

    #[test]
    fn quote_series_rejects_duplicate_dates() {
        let result = QuoteSeries::from_pairs([(d(2), 1.0), (d(2), 2.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn deserializing_validates_quotes() {
        let ok = r#"{"dates":["2024-01-02","2024-01-03"],"quotes":[10.0,11.0]}"#;
        let series: QuoteSeries = serde_json::from_str(ok).unwrap();
        assert_eq!(series.quote_on(d(3)), Some(11.0));

        let short = r#"{"dates":["2024-01-02","2024-01-03","2024-01-04"],"quotes":[10.0]}"#;
        assert!(serde_json::from_str::<QuoteSeries>(short).is_err());
        let unsorted = r#"{"dates":["2024-01-03","2024-01-02"],"quotes":[10.0,11.0]}"#;
        assert!(serde_json::from_str::<QuoteSeries>(unsorted).is_err());
    }

    #[test]
    fn empty_series_is_valid() {
        let series = QuoteSeries::new(vec![], vec![]).unwrap();
        assert!(series.is_empty());
    }
}
