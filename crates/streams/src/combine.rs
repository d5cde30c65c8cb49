//! Arithmetic between streams on their common calendar.

use ndarray::{Array1, Zip};
use stylefit_primitives::QuoteSeries;
use stylefit_traits::ReturnSeries;

use crate::{BasicStream, ReturnStream, StreamError, StreamOps, overlap};

/// Bucket both streams onto their common end dates.
fn aligned<A, B>(a: &A, b: &B) -> Result<(ReturnStream, ReturnStream), StreamError>
where
    A: ReturnSeries,
    B: ReturnSeries,
{
    let dates = overlap(a, &[b]);
    Ok((a.restrict_to_dates(&dates)?, b.restrict_to_dates(&dates)?))
}

/// Rebuild `template` with `returns` in place of its own.
fn with_returns(template: ReturnStream, returns: Array1<f64>) -> ReturnStream {
    let (start_dates, end_dates, _) = template.into_parts();
    ReturnStream::from_parts(start_dates, end_dates, returns)
}

/// Elementwise sum of two streams over their common dates.
///
/// Both streams are compounded onto the shared end dates first, so the
/// result's dates are the overlap and its start dates come from `a`.
///
/// # Errors
/// Propagates bucketing errors.
pub fn add_streams<A, B>(a: &A, b: &B) -> Result<ReturnStream, StreamError>
where
    A: ReturnSeries,
    B: ReturnSeries,
{
    let (ra, rb) = aligned(a, b)?;
    let sum = ra.returns() + rb.returns();
    Ok(with_returns(ra, sum))
}

/// `a - b` over their common dates.
///
/// # Errors
/// Propagates bucketing errors.
pub fn subtract_streams<A, B>(a: &A, b: &B) -> Result<ReturnStream, StreamError>
where
    A: ReturnSeries,
    B: ReturnSeries,
{
    add_streams(a, &b.scale(-1.0))
}

/// Elementwise maximum of two streams over their common dates.
///
/// Where the returns are equal the value from `a` is kept.
///
/// # Errors
/// Propagates bucketing errors.
pub fn max_streams<A, B>(a: &A, b: &B) -> Result<ReturnStream, StreamError>
where
    A: ReturnSeries,
    B: ReturnSeries,
{
    let (ra, rb) = aligned(a, b)?;
    let greater =
        Zip::from(ra.returns()).and(rb.returns()).map_collect(|&x, &y| if x >= y { x } else { y });
    Ok(with_returns(ra, greater))
}

/// Repair a primary quote history with a secondary one.
///
/// Builds a stream from each quote series and keeps the larger return on
/// each common date.
///
/// # Errors
/// Propagates bucketing errors.
pub fn hybrid_stream(
    primary: QuoteSeries,
    secondary: QuoteSeries,
) -> Result<ReturnStream, StreamError> {
    let primary = BasicStream::from_quotes(primary);
    let secondary = BasicStream::from_quotes(secondary);
    tracing::debug!(
        primary = primary.len(),
        secondary = secondary.len(),
        "building hybrid stream"
    );
    max_streams(&primary, &secondary)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use stylefit_primitives::Date;

    use super::*;
    use crate::build_stream;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn quotes(days: &[u32], values: &[f64]) -> QuoteSeries {
        QuoteSeries::new(days.iter().map(|&x| d(x)).collect(), values.to_vec()).unwrap()
    }

    #[test]
    fn add_on_common_dates() {
        let a = build_stream(vec![d(3), d(4), d(5), d(6)], vec![100.0, 101.0, 102.01, 103.0])
            .unwrap();
        let b = build_stream(vec![d(3), d(5), d(6)], vec![50.0, 51.0, 50.0]).unwrap();
        let sum = add_streams(&a, &b).unwrap();

        assert_eq!(sum.end_dates(), &[d(5), d(6)]);
        // a compounds 1% twice into the first bucket.
        assert_relative_eq!(sum.returns()[0], 0.0201 + 0.02, epsilon = 1e-12);
        assert_relative_eq!(
            sum.returns()[1],
            (103.0 / 102.01 - 1.0) + (50.0 / 51.0 - 1.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn subtracting_a_stream_from_itself_is_zero() {
        let a = build_stream(vec![d(3), d(4), d(5)], vec![10.0, 11.0, 12.5]).unwrap();
        let diff = subtract_streams(&a, &a).unwrap();
        assert_eq!(diff.len(), 2);
        assert!(diff.returns().iter().all(|r| r.abs() < 1e-15));
    }

    #[test]
    fn max_keeps_larger_return() {
        let a = build_stream(vec![d(3), d(4), d(5)], vec![100.0, 90.0, 99.0]).unwrap();
        let b = build_stream(vec![d(3), d(4), d(5)], vec![100.0, 101.0, 100.0]).unwrap();
        let best = max_streams(&a, &b).unwrap();
        assert_relative_eq!(best.returns()[0], 0.01, epsilon = 1e-12);
        assert_relative_eq!(best.returns()[1], 0.10, epsilon = 1e-12);
    }

    #[test]
    fn hybrid_repairs_bad_quote() {
        // The primary history has a spurious drop on day 5.
        let primary = quotes(&[3, 4, 5, 6], &[10.0, 10.1, 0.0, 10.3]);
        let secondary = quotes(&[3, 4, 5, 6], &[10.0, 10.1, 10.2, 10.3]);
        let hybrid = hybrid_stream(primary, secondary).unwrap();
        assert_eq!(hybrid.len(), 3);
        assert!(hybrid.returns().iter().all(|&r| r >= 0.0));
        assert_relative_eq!(hybrid.returns()[1], 10.2 / 10.1 - 1.0, epsilon = 1e-12);
    }
}
