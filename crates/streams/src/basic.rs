//! Streams built directly from quote series.

use ndarray::Array1;
use stylefit_primitives::{Date, QuoteSeries};
use stylefit_traits::ReturnSeries;

use crate::{ReturnStream, StreamError};

/// A return stream derived from a quote series.
///
/// For `N` quotes there are `N - 1` returns, `returns[i] = quotes[i+1] / quotes[i] - 1`,
/// with a zero quote producing a 0% return. The quotes are kept so the
/// stream can answer price lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicStream {
    quotes: QuoteSeries,
    stream: ReturnStream,
}

impl BasicStream {
    /// Build a stream from a validated quote series.
    #[must_use]
    pub fn from_quotes(quotes: QuoteSeries) -> Self {
        let dates = quotes.dates();
        let values = quotes.quotes();
        let n = dates.len().saturating_sub(1);

        let returns: Array1<f64> = values
            .windows(2)
            .map(|pair| if pair[0] == 0.0 { 0.0 } else { pair[1] / pair[0] - 1.0 })
            .collect();

        let start_dates = dates[..n].to_vec();
        let end_dates = dates.get(1..).map(<[Date]>::to_vec).unwrap_or_default();

        let stream = ReturnStream::from_parts(start_dates, end_dates, returns);
        Self { quotes, stream }
    }

    /// Quote on `date`, or `None` if there is no quote that day.
    #[must_use]
    pub fn quote_on(&self, date: Date) -> Option<f64> {
        self.quotes.quote_on(date)
    }

    /// The underlying quotes.
    #[must_use]
    pub const fn quotes(&self) -> &QuoteSeries {
        &self.quotes
    }

    /// The derived return stream.
    #[must_use]
    pub const fn stream(&self) -> &ReturnStream {
        &self.stream
    }

    /// Drop the quotes and keep the return stream.
    #[must_use]
    pub fn into_stream(self) -> ReturnStream {
        self.stream
    }
}

impl ReturnSeries for BasicStream {
    fn start_dates(&self) -> &[Date] {
        self.stream.start_dates()
    }

    fn end_dates(&self) -> &[Date] {
        self.stream.end_dates()
    }

    fn returns(&self) -> &Array1<f64> {
        self.stream.returns()
    }
}

/// Build a quote-derived stream from parallel dates and quotes.
///
/// # Errors
/// Returns an error if the lengths differ or the dates are not strictly
/// increasing.
pub fn build_stream(dates: Vec<Date>, quotes: Vec<f64>) -> Result<BasicStream, StreamError> {
    Ok(BasicStream::from_quotes(QuoteSeries::new(dates, quotes)?))
}
