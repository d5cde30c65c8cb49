//! Common trading calendars.

use std::collections::HashSet;

use stylefit_primitives::Date;
use stylefit_traits::ReturnSeries;

/// Fewest aligned observations that support a regression or statistics.
pub const MIN_ALIGNED_OBSERVATIONS: usize = 3;

/// End dates shared by `first` and every stream in `others`, sorted ascending.
pub fn overlap(first: &dyn ReturnSeries, others: &[&dyn ReturnSeries]) -> Vec<Date> {
    let mut common: HashSet<Date> = first.end_dates().iter().copied().collect();
    for other in others {
        let dates: HashSet<Date> = other.end_dates().iter().copied().collect();
        common.retain(|d| dates.contains(d));
        if common.is_empty() {
            break;
        }
    }

    let mut dates: Vec<Date> = common.into_iter().collect();
    dates.sort_unstable();
    dates
}

/// End dates shared by every stream in `streams`; empty when `streams` is empty.
pub fn overlap_all(streams: &[&dyn ReturnSeries]) -> Vec<Date> {
    match streams.split_first() {
        Some((first, others)) => overlap(*first, others),
        None => Vec::new(),
    }
}
