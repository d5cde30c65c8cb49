//! Quote-to-quote returns over a window.

use std::collections::BTreeMap;

use stylefit_primitives::{Date, FactorName};

use crate::BasicStream;

/// Return from the quote on `start` to the quote on `end`.
///
/// `None` when either date has no quote. A zero starting quote yields 0.
#[must_use]
pub fn period_return(stream: &BasicStream, start: Date, end: Date) -> Option<f64> {
    let first = stream.quote_on(start)?;
    let last = stream.quote_on(end)?;
    if first == 0.0 {
        return Some(0.0);
    }
    Some(last / first - 1.0)
}

/// Period returns for each named quote stream that has quotes on both dates.
pub fn basket_period_returns<'a, I>(streams: I, start: Date, end: Date) -> BTreeMap<FactorName, f64>
where
    I: IntoIterator<Item = (&'a FactorName, &'a BasicStream)>,
{
    streams
        .into_iter()
        .filter_map(|(name, stream)| period_return(stream, start, end).map(|r| (name.clone(), r)))
        .collect()
}
