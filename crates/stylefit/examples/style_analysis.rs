//! Example: Style Analysis on Synthetic Data
//!
//! Walks through the stylefit workflow without network access:
//! 1. Simulating daily benchmark and fund NAV quotes
//! 2. Resampling to weekly buckets anchored on Wednesday
//! 3. Fitting a style mapping on a training window
//! 4. Reporting fit statistics on a test window
//! 5. Running a parallel batch over several funds
//! 6. Scanning for anomalous returns
//!
//! Run with: `cargo run --example style_analysis --features full`

use chrono::{Datelike, Weekday};
use polars::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};
use stylefit::{
    model::{
        AnalysisConfig, Basket, Fund, Outcome, StyleRegressor, Valuations, run_batch, scan_batch,
        stats_frame,
    },
    primitives::{Date, DateWindow, FactorName, Frequency, FundId, QuoteSeries, ResampleOptions},
    traits::{ConstantLookup, ReturnSeries, fund_value_fn},
    utils::{basket_frame, mapping_frame},
};

/// Daily drift and volatility of each simulated benchmark.
const BENCHMARKS: &[(&str, f64, f64)] = &[
    (FactorName::SPX, 0.0004, 0.011),
    (FactorName::AGG, 0.0001, 0.003),
    (FactorName::TBILL, 0.00015, 0.0002),
    (FactorName::RTY, 0.0003, 0.014),
    (FactorName::EAFE, 0.0002, 0.010),
];

/// True style weights of the simulated funds.
const TRUE_WEIGHTS: &[&[(&str, f64)]] = &[
    &[(FactorName::SPX, 0.6), (FactorName::AGG, 0.4)],
    &[(FactorName::SPX, 0.3), (FactorName::RTY, 0.3), (FactorName::EAFE, 0.4)],
    &[(FactorName::AGG, 0.7), (FactorName::TBILL, 0.3)],
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    print_header();

    let mut rng = StdRng::seed_from_u64(7);
    let dates = trading_days(Date::from_ymd_opt(2021, 1, 4).ok_or("bad date")?, 3 * 252);
    let first = dates[0];
    let last = dates[dates.len() - 1];

    // Step 1: Simulate benchmark returns and quotes
    let mut daily_returns = Vec::with_capacity(BENCHMARKS.len());
    for &(name, drift, vol) in BENCHMARKS {
        let normal = Normal::new(drift, vol)?;
        let returns: Vec<f64> = (1..dates.len()).map(|_| normal.sample(&mut rng)).collect();
        daily_returns.push((name, returns));
    }
    let mut benchmark_quotes = Vec::with_capacity(daily_returns.len());
    for (name, returns) in &daily_returns {
        benchmark_quotes.push((*name, QuoteSeries::new(dates.clone(), to_quotes(returns))?));
    }

    // Step 2: Weekly buckets
    let config = AnalysisConfig {
        frequency: Frequency::Weekly,
        resample: ResampleOptions::forced(Weekday::Wed),
        ..AnalysisConfig::default()
    };
    config.validate()?;
    let basket = Basket::from_quotes(benchmark_quotes).resample(config.frequency, config.resample)?;
    println!("Weekly benchmark returns (first rows):");
    println!("{}\n", basket_frame(&basket)?.head(Some(5)));

    // Step 3: Simulate funds as noisy blends of the benchmarks
    let noise = Normal::new(0.0, 0.0005)?;
    let mut funds = Vec::with_capacity(TRUE_WEIGHTS.len());
    for (code, weights) in TRUE_WEIGHTS.iter().enumerate() {
        let returns: Vec<f64> = (0..dates.len() - 1)
            .map(|t| {
                weights
                    .iter()
                    .map(|&(factor, w)| w * benchmark_return(&daily_returns, factor, t))
                    .sum::<f64>()
                    + noise.sample(&mut rng)
            })
            .collect();
        let quotes = QuoteSeries::new(dates.clone(), to_quotes(&returns))?;
        let id = FundId::base_nav(100, u32::try_from(code)? + 1);
        funds.push(Fund::from_quotes(id, quotes, config.frequency, config.resample)?);
    }

    // Step 4: Fit on the first two years, test on the last
    let split = dates[2 * 252];
    let train = DateWindow::new(first, split)?;
    let test = DateWindow::new(split, last)?;
    let regressor = StyleRegressor::new();
    let valuations = Valuations::new(
        ConstantLookup(250_000.0),
        ConstantLookup(50_000_000.0),
        fund_value_fn(|fund: &FundId, _date: Date| Ok(f64::from(fund.code) * 5_000_000.0)),
    );

    let fund = &mut funds[0];
    match fund.backtest(&regressor, &basket, train, test, &valuations, &config.stats)? {
        Outcome::Ready(record) => {
            record.print_summary(fund.mapping());
            if let Some(mapping) = fund.mapping() {
                println!("{}\n", mapping_frame(mapping)?);
            }
        }
        Outcome::NoResult(reason) => println!("No result: {reason}"),
    }

    // Step 5: Fit every fund, then run statistics as a parallel batch
    for fund in &mut funds {
        fund.regress(&regressor, &basket, train)?;
    }
    let results = run_batch(&funds, &basket, test, &valuations, &config.stats);
    let records: Vec<_> = results
        .into_iter()
        .filter_map(|(_, result)| result.ok().and_then(Outcome::ready))
        .collect();
    let frame = stats_frame(&records)?;
    println!("Batch statistics over the test window:");
    println!(
        "{}\n",
        frame
            .lazy()
            .select([col("code"), col("tracking_error"), col("beta"), col("r_squared"), col("pnl")])
            .collect()?
    );

    // Step 6: Inject a bad quote and scan for it
    let mut returns = daily_returns[0].1.clone();
    returns[100] = 0.08;
    let shocked = Fund::from_quotes(
        FundId::base_nav(100, 99),
        QuoteSeries::new(dates.clone(), to_quotes(&returns))?,
        Frequency::Daily,
        ResampleOptions::default(),
    )?;
    let window = DateWindow::new(first, last)?;
    for (id, scan) in scan_batch(std::slice::from_ref(&shocked), window, config.anomaly_threshold) {
        println!("{id}: {} anomalous return(s), first on {}", scan.len(), scan.flagged[0].0);
    }
    println!("Daily observations scanned: {}", shocked.len());

    print_footer();
    Ok(())
}

/// `n` consecutive weekdays starting at `start`.
fn trading_days(start: Date, n: usize) -> Vec<Date> {
    start
        .iter_days()
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .take(n)
        .collect()
}

/// Quotes starting at 100 that compound `returns`.
fn to_quotes(returns: &[f64]) -> Vec<f64> {
    let mut level = 100.0;
    std::iter::once(level)
        .chain(returns.iter().map(|r| {
            level *= 1.0 + r;
            level
        }))
        .collect()
}

fn benchmark_return(daily: &[(&str, Vec<f64>)], factor: &str, t: usize) -> f64 {
    daily.iter().find(|(name, _)| *name == factor).map_or(0.0, |(_, returns)| returns[t])
}

fn print_header() {
    println!("\n{}", "=".repeat(80));
    println!("STYLEFIT: RETURNS-BASED STYLE ANALYSIS ON SYNTHETIC DATA");
    println!("{}\n", "=".repeat(80));
}

fn print_footer() {
    println!("\n{}", "=".repeat(80));
    println!("Done.");
    println!("{}\n", "=".repeat(80));
}
