//! Memoized valuation lookups.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, TryLockError};

use dashmap::DashMap;
use stylefit_primitives::{Date, FundId};
use stylefit_traits::{DateCache, DateLookup, FundValueLookup, LookupError};
use tracing::{debug, warn};

type Slot = Arc<Mutex<Option<f64>>>;

/// Date-keyed get-or-compute cache over an expensive lookup.
///
/// Each distinct date is computed at most once for the life of the cache,
/// even when many threads request it at the same time: callers for a date
/// queue on that date's slot while the first one computes. Failed lookups
/// are not stored, so a later request retries. There is no eviction.
pub struct MemoCache<L> {
    name: String,
    lookup: L,
    slots: DashMap<Date, Slot>,
}

impl<L: DateLookup> MemoCache<L> {
    /// Create a cache named `name` over `lookup`.
    pub fn new(name: impl Into<String>, lookup: L) -> Self {
        Self { name: name.into(), lookup, slots: DashMap::new() }
    }

    /// Name used in logs and errors.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<L: DateLookup> DateCache for MemoCache<L> {
    fn get_or_compute(&self, date: Date) -> Result<f64, LookupError> {
        let slot = Arc::clone(&self.slots.entry(date).or_default());
        let mut value = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = *value {
            return Ok(cached);
        }

        let computed = self.lookup.lookup(date).inspect_err(|err| {
            warn!(cache = %self.name, %date, error = %err, "valuation lookup failed");
        })?;
        if !computed.is_finite() {
            return Err(LookupError::NonFinite { date, value: computed });
        }

        debug!(cache = %self.name, %date, value = computed, "cached valuation");
        *value = Some(computed);
        Ok(computed)
    }

    fn cached(&self, date: Date) -> Option<f64> {
        let slot = self.slots.get(&date).map(|entry| Arc::clone(entry.value()))?;
        let value = *slot.lock().unwrap_or_else(PoisonError::into_inner);
        value
    }

    fn len(&self) -> usize {
        // Slots still being computed count as empty.
        self.slots
            .iter()
            .filter(|entry| match entry.value().try_lock() {
                Ok(value) => value.is_some(),
                Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().is_some(),
                Err(TryLockError::WouldBlock) => false,
            })
            .count()
    }
}

impl<L> fmt::Debug for MemoCache<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoCache")
            .field("name", &self.name)
            .field("dates", &self.slots.len())
            .finish_non_exhaustive()
    }
}

/// The two date-keyed valuation caches plus the per-fund value source.
///
/// Cheap to clone; clones share the same caches.
#[derive(Clone)]
pub struct Valuations {
    delta: Arc<dyn DateCache>,
    account_value: Arc<dyn DateCache>,
    fund_value: Arc<dyn FundValueLookup>,
}

impl Valuations {
    /// Wrap the shock-delta and total account value lookups in fresh caches.
    pub fn new<D, A, F>(delta: D, account_value: A, fund_value: F) -> Self
    where
        D: DateLookup + 'static,
        A: DateLookup + 'static,
        F: FundValueLookup + 'static,
    {
        Self {
            delta: Arc::new(MemoCache::new("delta", delta)),
            account_value: Arc::new(MemoCache::new("account_value", account_value)),
            fund_value: Arc::new(fund_value),
        }
    }

    /// Use caller-provided caches, e.g. deterministic stand-ins in tests.
    pub fn with_caches(
        delta: Arc<dyn DateCache>,
        account_value: Arc<dyn DateCache>,
        fund_value: Arc<dyn FundValueLookup>,
    ) -> Self {
        Self { delta, account_value, fund_value }
    }

    /// Shock delta on `date`, computed at most once per date.
    ///
    /// # Errors
    /// Propagates the lookup error.
    pub fn cached_delta(&self, date: Date) -> Result<f64, LookupError> {
        self.delta.get_or_compute(date)
    }

    /// Total account value on `date`, computed at most once per date.
    ///
    /// # Errors
    /// Propagates the lookup error.
    pub fn cached_account_value(&self, date: Date) -> Result<f64, LookupError> {
        self.account_value.get_or_compute(date)
    }

    /// Account value held by `fund` on `date`.
    ///
    /// # Errors
    /// Propagates the lookup error.
    pub fn fund_value(&self, fund: &FundId, date: Date) -> Result<f64, LookupError> {
        self.fund_value.fund_value(fund, date)
    }

    /// Fund's share of the shock delta on `date`.
    ///
    /// The cached delta scaled by the fund's value over the cached total
    /// account value; 0 when the total is 0.
    ///
    /// # Errors
    /// Propagates lookup errors.
    pub fn delta_estimate(&self, fund: &FundId, date: Date) -> Result<f64, LookupError> {
        let total = self.cached_account_value(date)?;
        if total == 0.0 {
            return Ok(0.0);
        }
        Ok(self.cached_delta(date)? * self.fund_value(fund, date)? / total)
    }

    /// Number of dates cached as (delta, account value).
    #[must_use]
    pub fn cached_dates(&self) -> (usize, usize) {
        (self.delta.len(), self.account_value.len())
    }
}

impl fmt::Debug for Valuations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (delta, account_value) = self.cached_dates();
        f.debug_struct("Valuations")
            .field("delta_dates", &delta)
            .field("account_value_dates", &account_value)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    use approx::assert_relative_eq;
    use stylefit_traits::{ConstantLookup, fund_value_fn, lookup_fn};

    use super::*;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 9, day).unwrap()
    }

    #[test]
    fn computes_each_date_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let cache = MemoCache::new(
            "delta",
            lookup_fn(move |date: Date| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(if date == d(2) { 2.0 } else { 1.0 })
            }),
        );

        assert_eq!(cache.get_or_compute(d(2)), Ok(2.0));
        assert_eq!(cache.get_or_compute(d(2)), Ok(2.0));
        assert_eq!(cache.get_or_compute(d(3)), Ok(1.0));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.cached(d(2)), Some(2.0));
        assert_eq!(cache.cached(d(4)), None);
    }

    #[test]
    fn failures_are_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let cache = MemoCache::new(
            "account_value",
            lookup_fn(move |date: Date| {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(LookupError::Failed { date, message: "timeout".to_string() })
                } else {
                    Ok(10.0)
                }
            }),
        );

        assert!(cache.get_or_compute(d(5)).is_err());
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.get_or_compute(d(5)), Ok(10.0));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let cache = MemoCache::new("delta", ConstantLookup(f64::NAN));
        assert!(matches!(cache.get_or_compute(d(1)), Err(LookupError::NonFinite { .. })));
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_requests_compute_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let cache = Arc::new(MemoCache::new(
            "delta",
            lookup_fn(move |_date: Date| {
                counter.fetch_add(1, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(20));
                Ok(3.5)
            }),
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.get_or_compute(d(9)))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(3.5));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn delta_estimate_scales_by_fund_share() {
        let valuations = Valuations::new(
            ConstantLookup(1_000.0),
            ConstantLookup(50_000.0),
            fund_value_fn(|_fund: &FundId, _date: Date| Ok(5_000.0)),
        );
        let fund = FundId::base_nav(101, 12);
        assert_relative_eq!(valuations.delta_estimate(&fund, d(1)).unwrap(), 100.0);
        assert_eq!(valuations.cached_dates(), (1, 1));
    }

    #[test]
    fn delta_estimate_zero_total() {
        let valuations =
            Valuations::new(ConstantLookup(1_000.0), ConstantLookup(0.0), ConstantLookup(5.0));
        let fund = FundId::base_nav(101, 12);
        assert_eq!(valuations.delta_estimate(&fund, d(1)), Ok(0.0));
    }

    #[test]
    fn injected_caches_are_used() {
        let delta: Arc<dyn DateCache> = Arc::new(MemoCache::new("delta", ConstantLookup(2.0)));
        let total: Arc<dyn DateCache> = Arc::new(MemoCache::new("total", ConstantLookup(4.0)));
        let valuations = Valuations::with_caches(delta, total, Arc::new(ConstantLookup(1.0)));
        let fund = FundId::base_nav(101, 1);
        assert_eq!(valuations.delta_estimate(&fund, d(1)), Ok(0.5));
        assert_eq!(valuations.fund_value(&fund, d(1)), Ok(1.0));
    }
}
