//! Property tests for stream construction and calendar alignment.

use proptest::prelude::*;
use stylefit_primitives::Date;
use stylefit_streams::{StreamOps, build_stream, overlap};
use stylefit_traits::ReturnSeries;

fn base() -> Date {
    Date::from_ymd_opt(2023, 1, 2).expect("valid date")
}

/// Strictly increasing dates built from positive day gaps.
fn dates_strategy(max_len: usize) -> impl Strategy<Value = Vec<Date>> {
    prop::collection::vec(1u64..5, 1..max_len).prop_map(|gaps| {
        let mut current = base();
        gaps.into_iter()
            .map(|gap| {
                current = current + chrono::Days::new(gap);
                current
            })
            .collect()
    })
}

/// Dates paired with quotes, some of them zero.
fn quotes_strategy() -> impl Strategy<Value = (Vec<Date>, Vec<f64>)> {
    dates_strategy(40).prop_flat_map(|dates| {
        let n = dates.len();
        (
            Just(dates),
            prop::collection::vec(prop_oneof![1 => Just(0.0), 9 => 1.0..500.0f64], n),
        )
    })
}

proptest! {
    #[test]
    fn basic_stream_return_law((dates, quotes) in quotes_strategy()) {
        let stream = build_stream(dates.clone(), quotes.clone()).unwrap();
        prop_assert_eq!(stream.len(), dates.len() - 1);
        for i in 0..stream.len() {
            let expected = if quotes[i] == 0.0 { 0.0 } else { quotes[i + 1] / quotes[i] - 1.0 };
            prop_assert_eq!(stream.returns()[i], expected);
            prop_assert_eq!(stream.start_dates()[i], dates[i]);
            prop_assert_eq!(stream.end_dates()[i], dates[i + 1]);
        }
    }

    #[test]
    fn overlap_commutes(a in dates_strategy(30), b in dates_strategy(30)) {
        let sa = build_stream(a.clone(), vec![1.0; a.len()]).unwrap();
        let sb = build_stream(b.clone(), vec![1.0; b.len()]).unwrap();
        prop_assert_eq!(overlap(&sa, &[&sb]), overlap(&sb, &[&sa]));
    }

    #[test]
    fn overlap_associates(
        a in dates_strategy(30),
        b in dates_strategy(30),
        c in dates_strategy(30),
    ) {
        let sa = build_stream(a.clone(), vec![1.0; a.len()]).unwrap();
        let sb = build_stream(b.clone(), vec![1.0; b.len()]).unwrap();
        let sc = build_stream(c.clone(), vec![1.0; c.len()]).unwrap();

        let all = overlap(&sa, &[&sb, &sc]);
        let ab = overlap(&sa, &[&sb]);
        let common: Vec<Date> = ab.into_iter().filter(|d| sc.end_dates().contains(d)).collect();
        prop_assert_eq!(&all, &common);
        prop_assert_eq!(all, overlap(&sc, &[&sb, &sa]));
    }

    #[test]
    fn bucketing_preserves_total_growth(
        (dates, quotes) in quotes_strategy(),
        keep in prop::collection::vec(any::<bool>(), 40),
    ) {
        let stream = build_stream(dates, quotes.iter().map(|q| q + 1.0).collect()).unwrap();
        prop_assume!(!stream.is_empty());

        let mut boundaries: Vec<Date> = stream
            .end_dates()
            .iter()
            .zip(&keep)
            .filter(|(_, k)| **k)
            .map(|(d, _)| *d)
            .collect();
        if boundaries.last() != stream.end_dates().last() {
            boundaries.extend(stream.end_dates().last().copied());
        }

        let bucketed = stream.restrict_to_dates(&boundaries).unwrap();
        let native: f64 = stream.returns().iter().map(|r| 1.0 + r).product();
        let coarse: f64 = bucketed.returns().iter().map(|r| 1.0 + r).product();
        prop_assert!((native - coarse).abs() <= 1e-9 * native.abs().max(1.0));
    }
}
