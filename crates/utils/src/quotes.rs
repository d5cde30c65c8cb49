//! Reading quote series from frames.

use polars::prelude::*;
use stylefit_primitives::QuoteSeries;

use crate::UtilsError;

/// Read a quote series from a frame with a date column and a value column.
///
/// Rows with a null date or value are dropped and the rest are sorted by
/// date. Repeated dates are rejected.
///
/// # Errors
/// Returns `UtilsError::MissingColumn` if either column is absent and
/// `UtilsError::Quotes` if dates repeat.
pub fn quotes_from_frame(
    df: &DataFrame,
    date_col: &str,
    value_col: &str,
) -> Result<QuoteSeries, UtilsError> {
    for name in [date_col, value_col] {
        if df.column(name).is_err() {
            return Err(UtilsError::MissingColumn(name.to_string()));
        }
    }

    let sorted = df
        .clone()
        .lazy()
        .select([col(date_col).cast(DataType::Date), col(value_col).cast(DataType::Float64)])
        .drop_nulls(None)
        .sort([date_col], SortMultipleOptions::default())
        .collect()?;

    let dates = sorted
        .column(date_col)?
        .as_materialized_series()
        .date()?
        .as_date_iter()
        .flatten()
        .collect();
    let values =
        sorted.column(value_col)?.as_materialized_series().f64()?.into_no_null_iter().collect();

    Ok(QuoteSeries::new(dates, values)?)
}
