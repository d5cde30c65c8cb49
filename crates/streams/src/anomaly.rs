//! Scanning for suspicious returns.

use stylefit_primitives::Date;
use stylefit_traits::ReturnSeries;

/// Default absolute return above which an observation is flagged.
pub const DEFAULT_ANOMALY_THRESHOLD: f64 = 0.03;

/// Result of an anomaly scan.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnomalyScan {
    /// Whether any return was flagged.
    pub found: bool,
    /// Flagged `(date, return)` pairs in date order.
    pub flagged: Vec<(Date, f64)>,
}

impl AnomalyScan {
    /// Number of flagged returns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flagged.len()
    }

    /// Check if nothing was flagged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flagged.is_empty()
    }
}

/// Flag every return in `[start, end]` whose magnitude exceeds `threshold`.
///
/// Each calendar day in the window is checked; days without an observation
/// are skipped.
pub fn detect_anomalies<S>(series: &S, start: Date, end: Date, threshold: f64) -> AnomalyScan
where
    S: ReturnSeries + ?Sized,
{
    let flagged: Vec<(Date, f64)> = start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter_map(|day| series.value_at(day).map(|r| (day, r)))
        .filter(|(_, r)| r.abs() > threshold)
        .collect();

    if !flagged.is_empty() {
        tracing::warn!(count = flagged.len(), %start, %end, "anomalous returns found");
    }

    AnomalyScan { found: !flagged.is_empty(), flagged }
}
