//! Style analysis CLI tool.
//!
//! Regresses a fund's daily adjusted closes on ETF proxies of the standard
//! benchmarks, then reports fit statistics over a held-out test window and
//! scans the fund for anomalous returns.
//!
//! Usage: `cargo run --bin analyze --features cli -- TICKER [--years N] [--test-months N]
//! [--freq D|W|M] [--threshold X] [--delta X] [--account-value X] [--fund-value X]`
//!
//! Example: `cargo run --bin analyze --features cli -- VBIAX --years 5 --freq W`

use std::{collections::BTreeMap, env, str::FromStr};

use chrono::{DateTime, Months};
use stylefit::{
    model::{AnalysisConfig, Basket, Fund, Outcome, StyleRegressor, Valuations},
    primitives::{Date, DateWindow, FactorName, Frequency, FundId, QuoteSeries},
    streams::{basket_period_returns, BasicStream},
    traits::{ConstantLookup, ReturnSeries, StyleEstimator},
    utils::{anomaly_frame, mapping_frame},
};
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};
use yahoo_finance_api as yahoo;

/// Default history length in years.
const DEFAULT_YEARS: i64 = 5;

/// Default length of the test window in months.
const DEFAULT_TEST_MONTHS: u32 = 12;

/// ETF proxies for the standard benchmarks.
const BENCHMARK_PROXIES: &[(&str, &str)] = &[
    ("SPY", FactorName::SPX),
    ("AGG", FactorName::AGG),
    ("BIL", FactorName::TBILL),
    ("IWM", FactorName::RTY),
    ("EFA", FactorName::EAFE),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1].starts_with("--") {
        eprintln!(
            "Usage: analyze TICKER [--years N] [--test-months N] [--freq D|W|M] [--threshold X] \
             [--delta X] [--account-value X] [--fund-value X]"
        );
        eprintln!("Example: analyze VBIAX --years 5 --freq W");
        std::process::exit(1);
    }

    let ticker = args[1].to_uppercase();
    let options = CliOptions::parse(&args)?;

    println!(
        "\nAnalyzing {} over {} year(s) at {} frequency...\n",
        ticker, options.years, options.config.frequency
    );

    if let Err(e) = run_analysis(&ticker, &options).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}

/// Settings collected from the command line.
struct CliOptions {
    years: i64,
    test_months: u32,
    config: AnalysisConfig,
    delta: f64,
    account_value: f64,
    fund_value: f64,
}

impl CliOptions {
    fn parse(args: &[String]) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = AnalysisConfig::default();
        if let Some(code) = parse_flag::<String>(args, "--freq") {
            config.frequency =
                Frequency::from_code(&code).ok_or_else(|| format!("unknown frequency {code}"))?;
        }
        if let Some(threshold) = parse_flag(args, "--threshold") {
            config.anomaly_threshold = threshold;
        }
        config.validate()?;

        Ok(Self {
            years: parse_flag(args, "--years").unwrap_or(DEFAULT_YEARS),
            test_months: parse_flag(args, "--test-months").unwrap_or(DEFAULT_TEST_MONTHS),
            config,
            delta: parse_flag(args, "--delta").unwrap_or(0.0),
            account_value: parse_flag(args, "--account-value").unwrap_or(1.0),
            fund_value: parse_flag(args, "--fund-value").unwrap_or(0.0),
        })
    }
}

fn parse_flag<T: FromStr>(args: &[String], flag: &str) -> Option<T> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            if let Ok(value) = args[i + 1].parse::<T>() {
                return Some(value);
            }
        }
    }
    None
}

/// Fetch, regress, report and scan.
async fn run_analysis(
    ticker: &str,
    options: &CliOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = &options.config;
    let provider = yahoo::YahooConnector::new()?;
    let end = OffsetDateTime::now_utc();
    let start = end - Duration::days(options.years * 365);

    let fund_quotes = fetch_quotes(&provider, ticker, start, end).await?;
    let mut benchmark_quotes = Vec::with_capacity(BENCHMARK_PROXIES.len());
    for &(proxy, factor) in BENCHMARK_PROXIES {
        match fetch_quotes(&provider, proxy, start, end).await {
            Ok(quotes) => benchmark_quotes.push((factor, quotes)),
            Err(e) => warn!(proxy, factor, error = %e, "skipping benchmark"),
        }
    }
    info!(benchmarks = benchmark_quotes.len(), fund_quotes = fund_quotes.len(), "loaded quotes");

    let (first, last) = match (fund_quotes.dates().first(), fund_quotes.dates().last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Err(format!("no quotes for {ticker}").into()),
    };
    // Snap the split back onto a trading day so period returns find quotes.
    let split = last
        .checked_sub_months(Months::new(options.test_months))
        .map(|target| fund_quotes.dates().partition_point(|&date| date <= target))
        .and_then(|n| n.checked_sub(1))
        .map(|i| fund_quotes.dates()[i])
        .filter(|&split| split > first)
        .ok_or("history too short for the test window")?;
    let history = DateWindow::new(first, last)?;
    let train = DateWindow::new(first, split)?;
    let test = DateWindow::new(split, last)?;

    let period_streams: Vec<(FactorName, BasicStream)> = benchmark_quotes
        .iter()
        .map(|(factor, quotes)| {
            (FactorName::from(*factor), BasicStream::from_quotes(quotes.clone()))
        })
        .collect();
    let basket = Basket::from_quotes(benchmark_quotes).resample(config.frequency, config.resample)?;
    let mut fund = Fund::from_quotes(
        FundId::new(0, ticker, 0),
        fund_quotes,
        config.frequency,
        config.resample,
    )?;
    info!(observations = fund.len(), "built fund stream");

    let regressor = StyleRegressor::with_config(config.regression.clone());
    let valuations = Valuations::new(
        ConstantLookup(options.delta),
        ConstantLookup(options.account_value),
        ConstantLookup(options.fund_value),
    );

    match fund.backtest(&regressor, &basket, train, test, &valuations, &config.stats)? {
        Outcome::Ready(record) => {
            record.print_summary(fund.mapping());
            if let Some(mapping) = fund.mapping() {
                println!("Fitted weights:\n{}", mapping_frame(mapping)?);
            }
        }
        Outcome::NoResult(reason) => println!("No statistics for {ticker}: {reason}"),
    }

    println!("\nBenchmark returns over the test window:");
    let period_returns = basket_period_returns(
        period_streams.iter().map(|(factor, stream)| (factor, stream)),
        test.start,
        test.end,
    );
    for (factor, ret) in &period_returns {
        println!("  {:<8} {:>+8.2}%", factor.as_str(), ret * 100.0);
    }

    let scan = fund.anomalies(history, config.anomaly_threshold);
    if scan.found {
        println!(
            "\n{} return(s) beyond {:.1}%:\n{}",
            scan.len(),
            config.anomaly_threshold * 100.0,
            anomaly_frame(&scan)?
        );
    } else {
        println!("\nNo returns beyond {:.1}%.", config.anomaly_threshold * 100.0);
    }

    Ok(())
}

/// Daily adjusted closes for `symbol`, one per date.
async fn fetch_quotes(
    provider: &yahoo::YahooConnector,
    symbol: &str,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Result<QuoteSeries, Box<dyn std::error::Error>> {
    let response = provider.get_quote_history(symbol, start, end).await?;
    let quotes = response.quotes()?;

    // Keyed by date so a repeated final bar keeps the latest close.
    let mut closes: BTreeMap<Date, f64> = BTreeMap::new();
    for quote in &quotes {
        let Some(date) = i64::try_from(quote.timestamp)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.date_naive())
        else {
            continue;
        };
        closes.insert(date, quote.adjclose);
    }

    Ok(QuoteSeries::from_pairs(closes)?)
}
