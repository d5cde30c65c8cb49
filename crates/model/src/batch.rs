//! Parallel runs over many funds.

use rayon::prelude::*;
use stylefit_primitives::{DateWindow, FundId};
use stylefit_streams::AnomalyScan;
use tracing::{info, warn};

use crate::{Basket, Fund, ModelError, Outcome, StatsConfig, StatsRecord, Valuations};

/// Per-fund result of a batch run.
pub type BatchResult = (FundId, Result<Outcome<StatsRecord>, ModelError>);

/// Compute statistics for every fund over `window`, in parallel.
///
/// Funds share `valuations`, so each valuation date is looked up at most
/// once across the whole batch. Results come back in input order.
pub fn run_batch(
    funds: &[Fund],
    basket: &Basket,
    window: DateWindow,
    valuations: &Valuations,
    config: &StatsConfig,
) -> Vec<BatchResult> {
    info!(funds = funds.len(), start = %window.start, end = %window.end, "starting stats batch");

    let results: Vec<BatchResult> = funds
        .par_iter()
        .map(|fund| (fund.id().clone(), fund.stats(basket, window, valuations, config)))
        .collect();

    let ready = results.iter().filter(|(_, r)| matches!(r, Ok(Outcome::Ready(_)))).count();
    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    if failed > 0 {
        warn!(failed, "stats batch had failures");
    }
    info!(ready, skipped = results.len() - ready - failed, failed, "finished stats batch");
    results
}

/// Scan every fund for anomalous returns over `window`, in parallel.
///
/// Only funds with at least one flagged return are reported.
pub fn scan_batch(
    funds: &[Fund],
    window: DateWindow,
    threshold: f64,
) -> Vec<(FundId, AnomalyScan)> {
    let flagged: Vec<(FundId, AnomalyScan)> = funds
        .par_iter()
        .filter_map(|fund| {
            let scan = fund.anomalies(window, threshold);
            scan.found.then(|| (fund.id().clone(), scan))
        })
        .collect();
    info!(scanned = funds.len(), flagged = flagged.len(), threshold, "finished anomaly scan");
    flagged
}
