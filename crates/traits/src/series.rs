//! Return series trait definitions.

use ndarray::Array1;
use stylefit_primitives::Date;

/// Read access to a time series of fractional returns.
///
/// Implementors hold three parallel sequences of equal length: start dates,
/// end dates and returns, where `returns[i]` is the change of the underlying
/// quantity from `start_dates[i]` to `end_dates[i]`. End dates are strictly
/// increasing.
pub trait ReturnSeries: Send + Sync {
    /// Start date of each return.
    fn start_dates(&self) -> &[Date];

    /// End date of each return.
    fn end_dates(&self) -> &[Date];

    /// Fractional returns (0.01 = 1%).
    fn returns(&self) -> &Array1<f64>;

    /// Number of returns.
    fn len(&self) -> usize {
        self.end_dates().len()
    }

    /// Check if empty.
    fn is_empty(&self) -> bool {
        self.end_dates().is_empty()
    }

    /// Index of the return ending on `date`.
    fn position(&self, date: Date) -> Option<usize> {
        self.end_dates().binary_search(&date).ok()
    }

    /// Return whose end date equals `date`, or `None` if absent.
    fn value_at(&self, date: Date) -> Option<f64> {
        self.position(date).map(|i| self.returns()[i])
    }

    /// First start date of the series.
    fn first_date(&self) -> Option<Date> {
        self.start_dates().first().copied()
    }

    /// Last end date of the series.
    fn last_date(&self) -> Option<Date> {
        self.end_dates().last().copied()
    }
}
