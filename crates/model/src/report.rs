//! Text and tabular output of statistics records.

use std::fmt;

use polars::prelude::{Column, DataFrame};
use stylefit_primitives::{Date, StyleMapping};

use crate::{ModelError, StatsRecord};

const RULE: &str =
    "================================================================================";
const THIN_RULE: &str =
    "--------------------------------------------------------------------------------";

/// Fixed-width report of one record, optionally with its mapping.
#[derive(Debug, Clone, Copy)]
pub struct StatsSummary<'a> {
    record: &'a StatsRecord,
    mapping: Option<&'a StyleMapping>,
}

impl fmt::Display for StatsSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.record;
        let fit = &record.fit;

        writeln!(f, "{RULE}")?;
        writeln!(f, "STYLE ANALYSIS: {}", record.fund)?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Period: {} to {}", record.window.start, record.window.end)?;
        writeln!(f, "Observations: {}", fit.observations)?;

        if let Some(mapping) = self.mapping {
            writeln!(f, "{THIN_RULE}")?;
            writeln!(f, "\nSTYLE MAPPING:")?;
            writeln!(f, "{:<20} {:>12}", "Benchmark", "Weight")?;
            writeln!(f, "{:-<20} {:-^12}", "", "")?;
            for (factor, weight) in mapping.iter() {
                writeln!(f, "{:<20} {:>11.2}%", factor.as_str(), weight * 100.0)?;
            }
        }

        writeln!(f, "\n{THIN_RULE}")?;
        writeln!(f, "RETURNS:")?;
        writeln!(f, "  Projected Return:        {:>+8.2}%", fit.projected_return * 100.0)?;
        writeln!(f, "  Actual Return:           {:>+8.2}%", fit.actual_return * 100.0)?;
        writeln!(f, "  Difference:              {:>+8.2}%", fit.difference * 100.0)?;
        writeln!(f, "  Alpha:                   {:>+8.4}%", fit.alpha * 100.0)?;
        writeln!(f, "\nFIT:")?;
        writeln!(f, "  Tracking Error:          {:>8.2}", fit.tracking_error)?;
        writeln!(f, "  Beta:                    {:>8.3}", fit.beta)?;
        writeln!(f, "  Volatility:              {:>8.2}%", fit.volatility * 100.0)?;
        writeln!(f, "  R-squared:               {:>8.1}%", fit.r_squared * 100.0)?;
        writeln!(f, "\nVALUATION:")?;
        writeln!(f, "  Account Value:           {:>14.2}", record.account_value)?;
        writeln!(f, "  Delta (1% shock):        {:>14.2}", record.delta)?;
        writeln!(f, "  P&L:                     {:>14.2}", record.pnl)?;
        write!(f, "{RULE}")
    }
}

impl StatsRecord {
    /// Fixed-width report of this record.
    #[must_use]
    pub const fn summary<'a>(&'a self, mapping: Option<&'a StyleMapping>) -> StatsSummary<'a> {
        StatsSummary { record: self, mapping }
    }

    /// Print the report to stdout.
    pub fn print_summary(&self, mapping: Option<&StyleMapping>) {
        println!("\n{}\n", self.summary(mapping));
    }
}

/// One row per record, for a persistence collaborator.
///
/// # Errors
/// Returns `ModelError::Polars` if the frame cannot be built.
pub fn stats_frame(records: &[StatsRecord]) -> Result<DataFrame, ModelError> {
    let floats = |f: fn(&StatsRecord) -> f64| records.iter().map(f).collect::<Vec<f64>>();

    let company: Vec<u32> = records.iter().map(|r| r.fund.company).collect();
    let mnemonic: Vec<String> = records.iter().map(|r| r.fund.mnemonic.clone()).collect();
    let code: Vec<u32> = records.iter().map(|r| r.fund.code).collect();
    let start: Vec<Date> = records.iter().map(|r| r.window.start).collect();
    let end: Vec<Date> = records.iter().map(|r| r.window.end).collect();
    let observations: Vec<u64> = records.iter().map(|r| r.fit.observations as u64).collect();

    let df = DataFrame::new(vec![
        Column::new("company".into(), company),
        Column::new("mnemonic".into(), mnemonic),
        Column::new("code".into(), code),
        Column::new("start".into(), start),
        Column::new("end".into(), end),
        Column::new("observations".into(), observations),
        Column::new("tracking_error".into(), floats(|r| r.fit.tracking_error)),
        Column::new("beta".into(), floats(|r| r.fit.beta)),
        Column::new("alpha".into(), floats(|r| r.fit.alpha)),
        Column::new("volatility".into(), floats(|r| r.fit.volatility)),
        Column::new("projected_return".into(), floats(|r| r.fit.projected_return)),
        Column::new("actual_return".into(), floats(|r| r.fit.actual_return)),
        Column::new("difference".into(), floats(|r| r.fit.difference)),
        Column::new("r_squared".into(), floats(|r| r.fit.r_squared)),
        Column::new("account_value".into(), floats(|r| r.account_value)),
        Column::new("delta".into(), floats(|r| r.delta)),
        Column::new("pnl".into(), floats(|r| r.pnl)),
    ])?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use stylefit_primitives::{DateWindow, FundId};

    use super::*;
    use crate::{FitStatistics, StatsConfig};

    fn record(code: u32, pnl_delta: f64) -> StatsRecord {
        let start = Date::from_ymd_opt(2024, 1, 2).unwrap();
        let end = Date::from_ymd_opt(2024, 6, 28).unwrap();
        let fit = FitStatistics {
            observations: 25,
            tracking_error: 42.5,
            beta: 0.98,
            alpha: 0.0001,
            volatility: 0.12,
            projected_return: 0.05,
            actual_return: 0.06,
            difference: 0.01,
            r_squared: 0.93,
        };
        StatsRecord::new(
            FundId::base_nav(101, code),
            DateWindow::new(start, end).unwrap(),
            fit,
            1_000_000.0,
            pnl_delta,
            &StatsConfig::default(),
        )
    }

    #[test]
    fn summary_lists_mapping_and_stats() {
        let record = record(12, 500.0);
        let mapping = StyleMapping::new([("SPX", 0.65), ("AGG", 0.35)]).unwrap();
        let text = record.summary(Some(&mapping)).to_string();
        assert!(text.contains("STYLE ANALYSIS: 101/BASENAV/12"));
        assert!(text.contains("Period: 2024-01-02 to 2024-06-28"));
        assert!(text.contains("SPX"));
        assert!(text.contains("65.00%"));
        assert!(text.contains("93.0%"));
        assert!(text.contains("500.00"));
    }

    #[test]
    fn summary_without_mapping_skips_weights() {
        let text = record(12, 1.0).summary(None).to_string();
        assert!(!text.contains("STYLE MAPPING"));
        assert!(text.contains("Tracking Error"));
    }

    #[test]
    fn frame_has_one_row_per_record() {
        let df = stats_frame(&[record(1, 10.0), record(2, 20.0)]).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 17);
        let pnl = df.column("pnl").unwrap().f64().unwrap();
        assert_eq!(pnl.get(1), Some(20.0 * 0.01 * 100.0));
    }

    #[test]
    fn empty_frame() {
        let df = stats_frame(&[]).unwrap();
        assert_eq!(df.height(), 0);
    }
}
