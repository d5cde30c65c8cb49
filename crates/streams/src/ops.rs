//! Operations available on every return series.

use ndarray::Array1;
use stylefit_primitives::{Date, Frequency, ResampleOptions, ensure_increasing};
use stylefit_traits::ReturnSeries;

use crate::{ReturnStream, StreamError, resample_dates};

/// Slicing, bucketing and scaling for any [`ReturnSeries`].
pub trait StreamOps: ReturnSeries {
    /// Copy into an owned [`ReturnStream`].
    fn to_stream(&self) -> ReturnStream {
        ReturnStream::from_parts(
            self.start_dates().to_vec(),
            self.end_dates().to_vec(),
            self.returns().clone(),
        )
    }

    /// Observations starting on or after `start` and ending on or before `end`.
    ///
    /// A `start` with no matching start date advances to the next start date
    /// present; an `end` with no matching end date retreats to the previous
    /// end date present. Returns `None` when nothing remains.
    fn slice(&self, start: Date, end: Date) -> Option<ReturnStream> {
        if start > end {
            return None;
        }
        let lo = self.start_dates().partition_point(|d| *d < start);
        let hi = self.end_dates().partition_point(|d| *d <= end);
        if lo >= hi {
            return None;
        }
        Some(ReturnStream::from_parts(
            self.start_dates()[lo..hi].to_vec(),
            self.end_dates()[lo..hi].to_vec(),
            self.returns().slice(ndarray::s![lo..hi]).to_owned(),
        ))
    }

    /// Compound the native returns into buckets closing on each of `dates`.
    ///
    /// The first bucket runs from the first start date of the series to
    /// `dates[0]`; each later bucket starts where the previous one ended.
    /// Returns after the last date are dropped.
    ///
    /// # Errors
    /// Returns an error if `dates` is not strictly increasing or contains a
    /// date that is not an end date of the series.
    fn restrict_to_dates(&self, dates: &[Date]) -> Result<ReturnStream, StreamError> {
        ensure_increasing(dates)?;
        if let Some(&missing) = dates.iter().find(|d| self.position(**d).is_none()) {
            return Err(StreamError::UnknownDate(missing));
        }
        let (Some(&first_start), false) = (self.start_dates().first(), dates.is_empty()) else {
            return Ok(ReturnStream::empty());
        };

        let mut start_dates = Vec::with_capacity(dates.len());
        let mut returns = Vec::with_capacity(dates.len());
        let mut pending = dates.iter().peekable();
        let mut bucket_start = first_start;
        let mut accumulated = 1.0;

        for (&end, &r) in self.end_dates().iter().zip(self.returns().iter()) {
            let Some(&&boundary) = pending.peek() else {
                break;
            };
            accumulated *= 1.0 + r;
            if end == boundary {
                start_dates.push(bucket_start);
                returns.push(accumulated - 1.0);
                accumulated = 1.0;
                bucket_start = end;
                pending.next();
            }
        }

        Ok(ReturnStream::from_parts(start_dates, dates.to_vec(), Array1::from(returns)))
    }

    /// Convert to a coarser frequency by compounding into bucket boundaries.
    ///
    /// # Errors
    /// Propagates errors from [`StreamOps::restrict_to_dates`].
    fn resample(
        &self,
        frequency: Frequency,
        options: ResampleOptions,
    ) -> Result<ReturnStream, StreamError> {
        if frequency == Frequency::Daily {
            return Ok(self.to_stream());
        }
        let dates = resample_dates(self, frequency, options);
        tracing::debug!(%frequency, buckets = dates.len(), "resampling stream");
        self.restrict_to_dates(&dates)
    }

    /// Multiply every return by `k`, dates unchanged.
    fn scale(&self, k: f64) -> ReturnStream {
        ReturnStream::from_parts(
            self.start_dates().to_vec(),
            self.end_dates().to_vec(),
            self.returns().mapv(|r| r * k),
        )
    }

    /// Population standard deviation of the returns.
    fn std_dev(&self) -> f64 {
        stylefit_math::std_dev(self.returns())
    }
}

impl<T: ReturnSeries + ?Sized> StreamOps for T {}
