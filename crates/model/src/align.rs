//! Aligning a fund with its benchmarks on a common calendar.

use std::collections::BTreeSet;

use ndarray::{Array1, Array2};
use stylefit_primitives::{Date, DateWindow, FactorName};
use stylefit_streams::{ReturnStream, StreamOps};
use stylefit_traits::ReturnSeries;
use tracing::{debug, warn};

use crate::{Basket, ModelError, NoResult, Outcome};

/// Fund and benchmark returns on identical observation dates.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedData {
    /// Benchmark returns (n_obs x n_factors), columns in `factor_names` order.
    pub factors: Array2<f64>,
    /// Fund returns (n_obs,).
    pub fund: Array1<f64>,
    /// Column order of `factors`.
    pub factor_names: Vec<FactorName>,
    /// Bucket end date of each observation.
    pub dates: Vec<Date>,
}

impl AlignedData {
    /// Number of aligned observations.
    #[must_use]
    pub fn n_obs(&self) -> usize {
        self.dates.len()
    }

    /// Number of benchmark factors.
    #[must_use]
    pub fn n_factors(&self) -> usize {
        self.factor_names.len()
    }

    /// First and last aligned dates.
    #[must_use]
    pub fn date_range(&self) -> Option<(Date, Date)> {
        Some((*self.dates.first()?, *self.dates.last()?))
    }
}

/// Dates a stream can be cut at: its first start date and every end date.
fn cut_points(stream: &ReturnStream) -> BTreeSet<Date> {
    stream.first_date().into_iter().chain(stream.end_dates().iter().copied()).collect()
}

/// Align `fund` and every stream in `basket` over `window`.
///
/// Each stream is cut to the window and the cut points shared by all of them
/// are found. The earliest shared point opens the first bucket, so every row
/// covers the same period in every stream, and the remaining points close the
/// buckets. Fewer than `min_observations` buckets is reported as
/// [`NoResult::InsufficientOverlap`].
///
/// # Errors
/// Returns `ModelError::EmptyBasket` for an empty basket and propagates
/// bucketing errors.
pub fn align<S>(
    fund: &S,
    basket: &Basket,
    window: DateWindow,
    min_observations: usize,
) -> Result<Outcome<AlignedData>, ModelError>
where
    S: ReturnSeries + ?Sized,
{
    if basket.is_empty() {
        return Err(ModelError::EmptyBasket);
    }

    let insufficient = |observations: usize| -> Result<Outcome<AlignedData>, ModelError> {
        warn!(observations, required = min_observations, "insufficient overlap for alignment");
        Ok(Outcome::NoResult(NoResult::InsufficientOverlap {
            observations,
            required: min_observations,
        }))
    };

    let Some(fund_slice) = fund.slice(window.start, window.end) else {
        return insufficient(0);
    };
    let mut benchmark_slices: Vec<ReturnStream> = Vec::with_capacity(basket.len());
    for (_, stream) in basket.iter() {
        match stream.slice(window.start, window.end) {
            Some(slice) => benchmark_slices.push(slice),
            None => return insufficient(0),
        }
    }

    let mut common = cut_points(&fund_slice);
    for slice in &benchmark_slices {
        let points = cut_points(slice);
        common.retain(|d| points.contains(d));
    }
    let mut points = common.into_iter();
    let Some(lead_in) = points.next() else {
        return insufficient(0);
    };
    let dates: Vec<Date> = points.collect();
    if dates.len() < min_observations.max(1) {
        return insufficient(dates.len());
    }

    // Every stream restarts at the shared lead-in so the first bucket matches.
    let bucket = |stream: &ReturnStream| -> Result<Array1<f64>, ModelError> {
        match stream.slice(lead_in, window.end) {
            Some(from_lead_in) => Ok(from_lead_in.restrict_to_dates(&dates)?.returns().clone()),
            None => Err(ModelError::DimensionMismatch(format!(
                "stream has no observations after {lead_in}"
            ))),
        }
    };

    let fund_returns = bucket(&fund_slice)?;
    let mut factors = Array2::zeros((dates.len(), benchmark_slices.len()));
    for (j, slice) in benchmark_slices.iter().enumerate() {
        factors.column_mut(j).assign(&bucket(slice)?);
    }

    debug!(
        observations = dates.len(),
        factors = benchmark_slices.len(),
        %lead_in,
        end = %window.end,
        "aligned fund with basket"
    );

    Ok(Outcome::Ready(AlignedData {
        factors,
        fund: fund_returns,
        factor_names: basket.factor_names(),
        dates,
    }))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use stylefit_primitives::{FactorName, QuoteSeries};
    use stylefit_streams::build_stream;

    use super::*;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn quotes(days: &[u32], values: &[f64]) -> QuoteSeries {
        QuoteSeries::new(days.iter().map(|&x| d(x)).collect(), values.to_vec()).unwrap()
    }

    fn window(start: u32, end: u32) -> DateWindow {
        DateWindow::new(d(start), d(end)).unwrap()
    }

    #[test]
    fn aligns_on_common_dates() {
        let fund = build_stream(
            vec![d(1), d(4), d(5), d(6), d(7), d(8)],
            vec![10.0, 10.1, 10.2, 10.1, 10.3, 10.4],
        )
        .unwrap();
        let basket = Basket::from_quotes([
            (
                FactorName::SPX,
                quotes(&[1, 4, 5, 6, 7, 8], &[100.0, 101.0, 102.0, 101.0, 103.0, 104.0]),
            ),
            (FactorName::AGG, quotes(&[1, 4, 6, 7, 8], &[50.0, 50.1, 50.2, 50.1, 50.3])),
        ]);

        let aligned = align(&fund, &basket, window(1, 8), 3).unwrap().ready().unwrap();
        assert_eq!(aligned.dates, vec![d(4), d(6), d(7), d(8)]);
        assert_eq!(aligned.factors.dim(), (4, 2));
        assert_eq!(aligned.factor_names[0].as_str(), "AGG");
        // SPX column compounds the 5th and 6th into one bucket.
        assert_relative_eq!(aligned.factors[[1, 1]], 101.0 / 101.0 - 1.0, epsilon = 1e-12);
        assert_relative_eq!(aligned.fund[1], 10.1 / 10.1 - 1.0, epsilon = 1e-12);
        assert_eq!(aligned.date_range(), Some((d(4), d(8))));
    }

    #[test]
    fn two_common_dates_is_no_result() {
        let fund = build_stream(vec![d(1), d(2), d(3)], vec![1.0, 1.1, 1.2]).unwrap();
        let basket = Basket::from_quotes([(
            FactorName::SPX,
            quotes(&[1, 2, 3, 4], &[1.0, 1.0, 1.0, 1.0]),
        )]);
        let outcome = align(&fund, &basket, window(1, 10), 3).unwrap();
        assert_eq!(
            outcome.reason(),
            Some(NoResult::InsufficientOverlap { observations: 2, required: 3 })
        );
    }

    #[test]
    fn window_without_data_is_no_result() {
        let fund = build_stream(vec![d(1), d(2), d(3)], vec![1.0, 1.1, 1.2]).unwrap();
        let basket =
            Basket::from_quotes([(FactorName::SPX, quotes(&[1, 2, 3], &[1.0, 1.0, 1.0]))]);
        let outcome = align(&fund, &basket, window(20, 25), 3).unwrap();
        assert!(!outcome.is_ready());
    }

    #[test]
    fn window_excludes_earlier_history() {
        let fund = build_stream(
            vec![d(1), d(2), d(3), d(4), d(5), d(6)],
            vec![1.0, 2.0, 2.0, 2.2, 2.42, 2.662],
        )
        .unwrap();
        let basket = Basket::from_quotes([(
            FactorName::SPX,
            quotes(&[1, 2, 3, 4, 5, 6], &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0]),
        )]);
        let aligned = align(&fund, &basket, window(3, 6), 3).unwrap().ready().unwrap();
        // The doubling on the 2nd lies outside the window.
        assert_eq!(aligned.n_obs(), 3);
        assert!(aligned.fund.iter().all(|r| (r - 0.1).abs() < 1e-9));
    }

    #[test]
    fn first_bucket_covers_the_same_period_everywhere() {
        // The fund quotes on the 2nd but SPX does not.
        let fund = build_stream(
            (1..=8).map(d).collect(),
            vec![10.0, 10.0, 10.5, 10.605, 10.7, 10.8, 10.9, 11.0],
        )
        .unwrap();
        let basket = Basket::from_quotes([(
            FactorName::SPX,
            quotes(&[1, 3, 4, 5, 6, 7, 8], &[100.0, 100.0, 101.0, 102.0, 103.0, 104.0, 105.0]),
        )]);

        let aligned = align(&fund, &basket, window(2, 8), 3).unwrap().ready().unwrap();
        assert_eq!(aligned.dates, vec![d(4), d(5), d(6), d(7), d(8)]);
        assert_relative_eq!(aligned.fund[0], 10.605 / 10.5 - 1.0, epsilon = 1e-12);
        assert_relative_eq!(aligned.factors[[0, 0]], 0.01, epsilon = 1e-12);
    }

    #[test]
    fn empty_basket_is_an_error() {
        let fund = build_stream(vec![d(1), d(2)], vec![1.0, 1.1]).unwrap();
        assert!(matches!(
            align(&fund, &Basket::new(), window(1, 2), 3),
            Err(ModelError::EmptyBasket)
        ));
    }
}
