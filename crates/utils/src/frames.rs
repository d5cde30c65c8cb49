//! Building frames from stylefit values.

use polars::prelude::*;
use stylefit_model::Basket;
use stylefit_primitives::{Date, StyleMapping};
use stylefit_streams::AnomalyScan;
use stylefit_traits::ReturnSeries;

use crate::UtilsError;

/// One row per observation: `start`, `end`, `return`.
///
/// # Errors
/// Returns `UtilsError::Polars` if the frame cannot be built.
pub fn stream_frame<S>(series: &S) -> Result<DataFrame, UtilsError>
where
    S: ReturnSeries + ?Sized,
{
    let df = DataFrame::new(vec![
        Column::new("start".into(), series.start_dates().to_vec()),
        Column::new("end".into(), series.end_dates().to_vec()),
        Column::new("return".into(), series.returns().to_vec()),
    ])?;
    Ok(df)
}

/// Long layout of a basket: `factor`, `start`, `end`, `return`.
///
/// Factors appear in column order, each factor's rows in date order.
///
/// # Errors
/// Returns `UtilsError::Polars` if the frame cannot be built.
pub fn basket_frame(basket: &Basket) -> Result<DataFrame, UtilsError> {
    let rows: usize = basket.iter().map(|(_, stream)| stream.len()).sum();
    let mut factors = Vec::with_capacity(rows);
    let mut starts = Vec::with_capacity(rows);
    let mut ends = Vec::with_capacity(rows);
    let mut returns = Vec::with_capacity(rows);

    for (factor, stream) in basket.iter() {
        factors.extend(std::iter::repeat_n(factor.as_str().to_string(), stream.len()));
        starts.extend_from_slice(stream.start_dates());
        ends.extend_from_slice(stream.end_dates());
        returns.extend(stream.returns().iter().copied());
    }

    let df = DataFrame::new(vec![
        Column::new("factor".into(), factors),
        Column::new("start".into(), starts),
        Column::new("end".into(), ends),
        Column::new("return".into(), returns),
    ])?;
    Ok(df)
}

/// One row per benchmark: `factor`, `weight`.
///
/// # Errors
/// Returns `UtilsError::Polars` if the frame cannot be built.
pub fn mapping_frame(mapping: &StyleMapping) -> Result<DataFrame, UtilsError> {
    let (factors, weights): (Vec<String>, Vec<f64>) =
        mapping.iter().map(|(factor, weight)| (factor.as_str().to_string(), weight)).unzip();
    let df = DataFrame::new(vec![
        Column::new("factor".into(), factors),
        Column::new("weight".into(), weights),
    ])?;
    Ok(df)
}

/// One row per flagged return: `date`, `return`.
///
/// # Errors
/// Returns `UtilsError::Polars` if the frame cannot be built.
pub fn anomaly_frame(scan: &AnomalyScan) -> Result<DataFrame, UtilsError> {
    let (dates, returns): (Vec<Date>, Vec<f64>) = scan.flagged.iter().copied().unzip();
    let df = DataFrame::new(vec![
        Column::new("date".into(), dates),
        Column::new("return".into(), returns),
    ])?;
    Ok(df)
}
