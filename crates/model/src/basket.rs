//! Benchmark baskets.

use std::collections::BTreeMap;

use stylefit_primitives::{FactorName, Frequency, QuoteSeries, ResampleOptions};
use stylefit_streams::{BasicStream, ReturnStream, StreamOps};

use crate::ModelError;

/// The investable universe a fund is regressed against.
///
/// Factors are kept in name order; that order fixes the columns of aligned
/// matrices and the solver's starting point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Basket {
    streams: BTreeMap<FactorName, ReturnStream>,
}

impl Basket {
    /// Create an empty basket.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a basket of quote-derived streams.
    pub fn from_quotes<N, I>(quotes: I) -> Self
    where
        N: Into<FactorName>,
        I: IntoIterator<Item = (N, QuoteSeries)>,
    {
        quotes
            .into_iter()
            .map(|(name, series)| (name.into(), BasicStream::from_quotes(series).into_stream()))
            .collect()
    }

    /// Add or replace a factor's stream, returning the previous one.
    pub fn insert(
        &mut self,
        name: impl Into<FactorName>,
        stream: ReturnStream,
    ) -> Option<ReturnStream> {
        self.streams.insert(name.into(), stream)
    }

    /// Stream for a factor.
    #[must_use]
    pub fn get(&self, name: &FactorName) -> Option<&ReturnStream> {
        self.streams.get(name)
    }

    /// Factor names in column order.
    #[must_use]
    pub fn factor_names(&self) -> Vec<FactorName> {
        self.streams.keys().cloned().collect()
    }

    /// Number of factors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Iterate over (factor, stream) pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&FactorName, &ReturnStream)> + '_ {
        self.streams.iter()
    }

    /// Resample every stream to `frequency`.
    ///
    /// # Errors
    /// Propagates resampling errors.
    pub fn resample(
        &self,
        frequency: Frequency,
        options: ResampleOptions,
    ) -> Result<Self, ModelError> {
        let streams = self
            .streams
            .iter()
            .map(|(name, stream)| {
                stream.resample(frequency, options).map(|resampled| (name.clone(), resampled))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(Self { streams })
    }
}

impl FromIterator<(FactorName, ReturnStream)> for Basket {
    fn from_iter<T: IntoIterator<Item = (FactorName, ReturnStream)>>(iter: T) -> Self {
        Self { streams: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use stylefit_primitives::Date;
    use stylefit_traits::ReturnSeries;

    use super::*;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn series(values: &[f64]) -> QuoteSeries {
        let dates = (0..values.len()).map(|i| d(1 + i as u32)).collect();
        QuoteSeries::new(dates, values.to_vec()).unwrap()
    }

    #[test]
    fn factors_are_name_ordered() {
        let basket = Basket::from_quotes([
            (FactorName::SPX, series(&[1.0, 1.1])),
            (FactorName::AGG, series(&[1.0, 1.0])),
            (FactorName::EAFE, series(&[1.0, 0.9])),
        ]);
        let names: Vec<String> = basket.factor_names().into_iter().map(|n| n.0).collect();
        assert_eq!(names, vec!["AGG", "EAFE", "SPX"]);
    }

    #[test]
    fn insert_replaces() {
        let mut basket = Basket::new();
        assert!(basket.insert(FactorName::SPX, ReturnStream::empty()).is_none());
        assert!(basket.insert(FactorName::SPX, ReturnStream::empty()).is_some());
        assert_eq!(basket.len(), 1);
    }

    #[test]
    fn resample_every_stream() {
        // 2024-01-03 and 2024-01-10 are Wednesdays.
        let basket = Basket::from_quotes([
            (FactorName::SPX, series(&[1.0; 12])),
            (FactorName::AGG, series(&[2.0; 12])),
        ]);
        let weekly = basket.resample(Frequency::Weekly, ResampleOptions::default()).unwrap();
        let spx = weekly.get(&FactorName::from(FactorName::SPX)).unwrap();
        assert_eq!(spx.end_dates(), &[d(3), d(10)]);
    }
}
