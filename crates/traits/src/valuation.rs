//! External valuation lookups and the date-keyed cache contract.

use stylefit_primitives::{Date, FundId};

/// Errors raised by external valuation lookups.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LookupError {
    /// No value exists for the date.
    #[error("{source_name} unavailable for {date}")]
    Unavailable {
        /// Name of the external source.
        source_name: String,
        /// Requested date.
        date: Date,
    },

    /// The external computation failed.
    #[error("lookup failed for {date}: {message}")]
    Failed {
        /// Requested date.
        date: Date,
        /// Failure description.
        message: String,
    },

    /// The external computation produced NaN or infinity.
    #[error("non-finite value {value} for {date}")]
    NonFinite {
        /// Requested date.
        date: Date,
        /// Offending value.
        value: f64,
    },
}

impl LookupError {
    /// Returns whether a batch may skip the item and continue.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// An expensive external computation keyed by date.
pub trait DateLookup: Send + Sync {
    /// Compute the value for `date`.
    ///
    /// # Errors
    /// Returns `LookupError` if the value cannot be produced.
    fn lookup(&self, date: Date) -> Result<f64, LookupError>;
}

impl<F> DateLookup for F
where
    F: Fn(Date) -> Result<f64, LookupError> + Send + Sync,
{
    fn lookup(&self, date: Date) -> Result<f64, LookupError> {
        self(date)
    }
}

/// Pin a closure to the [`DateLookup`] signature.
pub const fn lookup_fn<F>(f: F) -> F
where
    F: Fn(Date) -> Result<f64, LookupError> + Send + Sync,
{
    f
}

/// A lookup that returns the same value for every date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantLookup(pub f64);

impl DateLookup for ConstantLookup {
    fn lookup(&self, _date: Date) -> Result<f64, LookupError> {
        Ok(self.0)
    }
}

impl FundValueLookup for ConstantLookup {
    fn fund_value(&self, _fund: &FundId, _date: Date) -> Result<f64, LookupError> {
        Ok(self.0)
    }
}

/// Get-or-compute memoization keyed by date.
///
/// An implementation computes each distinct date at most once and returns
/// the stored value on every later request.
pub trait DateCache: Send + Sync {
    /// Return the cached value for `date`, computing it on first request.
    ///
    /// # Errors
    /// Propagates the lookup error; failures are not cached.
    fn get_or_compute(&self, date: Date) -> Result<f64, LookupError>;

    /// Cached value for `date`, without computing.
    fn cached(&self, date: Date) -> Option<f64>;

    /// Number of cached dates.
    fn len(&self) -> usize;

    /// Check if empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Value held by a single fund on a date.
pub trait FundValueLookup: Send + Sync {
    /// Fund's account value on `date`.
    ///
    /// # Errors
    /// Returns `LookupError` if the value cannot be produced.
    fn fund_value(&self, fund: &FundId, date: Date) -> Result<f64, LookupError>;
}

impl<F> FundValueLookup for F
where
    F: Fn(&FundId, Date) -> Result<f64, LookupError> + Send + Sync,
{
    fn fund_value(&self, fund: &FundId, date: Date) -> Result<f64, LookupError> {
        self(fund, date)
    }
}

/// Pin a closure to the [`FundValueLookup`] signature.
pub const fn fund_value_fn<F>(f: F) -> F
where
    F: Fn(&FundId, Date) -> Result<f64, LookupError> + Send + Sync,
{
    f
}
