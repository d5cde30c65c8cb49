//! Frequency conversion boundaries.

use chrono::{Datelike, Duration};
use stylefit_primitives::{Date, Frequency, ResampleOptions};
use stylefit_traits::ReturnSeries;

/// Bucket boundary dates for converting `series` to `frequency`.
///
/// Every returned date is one of the series' end dates and the list is
/// strictly increasing, so it can be passed straight to
/// [`StreamOps::restrict_to_dates`](crate::StreamOps::restrict_to_dates).
///
/// * `Daily` keeps every end date.
/// * `Weekly` keeps end dates on the anchor weekday. With `force_anchor`,
///   each week from the first anchor day onwards closes on the last
///   observation at or before that week's anchor day.
/// * `Monthly` keeps the last observation of each calendar month that is
///   followed by an observation in a later month.
pub fn resample_dates<S>(series: &S, frequency: Frequency, options: ResampleOptions) -> Vec<Date>
where
    S: ReturnSeries + ?Sized,
{
    let end_dates = series.end_dates();
    match frequency {
        Frequency::Daily => end_dates.to_vec(),
        Frequency::Weekly if options.force_anchor => forced_weekly(end_dates, options),
        Frequency::Weekly => {
            end_dates.iter().copied().filter(|d| d.weekday() == options.anchor).collect()
        }
        Frequency::Monthly => end_dates
            .windows(2)
            .filter(|pair| (pair[0].year(), pair[0].month()) != (pair[1].year(), pair[1].month()))
            .map(|pair| pair[0])
            .collect(),
    }
}

fn forced_weekly(end_dates: &[Date], options: ResampleOptions) -> Vec<Date> {
    let (Some(&first_anchor), Some(&last)) =
        (end_dates.iter().find(|d| d.weekday() == options.anchor), end_dates.last())
    else {
        return Vec::new();
    };

    let mut boundaries: Vec<Date> = Vec::new();
    let mut anchor = first_anchor;
    while anchor <= last {
        // Walk back to the latest observation on or before the anchor day.
        let idx = end_dates.partition_point(|d| *d <= anchor);
        if let Some(&boundary) = idx.checked_sub(1).and_then(|i| end_dates.get(i))
            && boundaries.last() != Some(&boundary)
        {
            boundaries.push(boundary);
        }
        anchor += Duration::days(7);
    }
    boundaries
}
