//! Funds and their style mappings.

use ndarray::Array1;
use stylefit_primitives::{
    Date, DateWindow, Frequency, FundId, MappingRecord, QuoteSeries, ResampleOptions,
    StyleMapping, resolve_mapping,
};
use stylefit_streams::{
    AnomalyScan, BasicStream, MIN_ALIGNED_OBSERVATIONS, ReturnStream, StreamOps,
    detect_anomalies, hybrid_stream,
};
use stylefit_traits::ReturnSeries;
use tracing::{debug, info};

use crate::{
    AlignedData, Basket, FitStatistics, ModelError, NoResult, Outcome, StatsConfig, StatsRecord,
    StyleRegressor, Valuations, align,
};

/// A fund's return history together with its current style mapping.
///
/// The stream is held at a single frequency, fixed at construction. Baskets
/// passed to [`Fund::regress`] and [`Fund::stats`] are expected to be at the
/// same frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct Fund {
    id: FundId,
    stream: ReturnStream,
    frequency: Frequency,
    mapping: Option<StyleMapping>,
}

impl Fund {
    /// Wrap an existing stream, assumed to already be at `frequency`.
    #[must_use]
    pub const fn new(id: FundId, stream: ReturnStream, frequency: Frequency) -> Self {
        Self { id, stream, frequency, mapping: None }
    }

    /// Build a fund from its NAV quotes, resampled once to `frequency`.
    ///
    /// # Errors
    /// Propagates resampling errors.
    pub fn from_quotes(
        id: FundId,
        quotes: QuoteSeries,
        frequency: Frequency,
        options: ResampleOptions,
    ) -> Result<Self, ModelError> {
        let stream = BasicStream::from_quotes(quotes).resample(frequency, options)?;
        debug!(fund = %id, %frequency, observations = stream.len(), "built fund stream");
        Ok(Self::new(id, stream, frequency))
    }

    /// Build a fund from two NAV sources, keeping the larger return each day.
    ///
    /// # Errors
    /// Propagates alignment and resampling errors.
    pub fn hybrid(
        id: FundId,
        primary: QuoteSeries,
        secondary: QuoteSeries,
        frequency: Frequency,
        options: ResampleOptions,
    ) -> Result<Self, ModelError> {
        let stream = hybrid_stream(primary, secondary)?.resample(frequency, options)?;
        Ok(Self::new(id, stream, frequency))
    }

    /// Set an externally supplied mapping.
    #[must_use]
    pub fn with_mapping(mut self, mapping: StyleMapping) -> Self {
        self.mapping = Some(mapping);
        self
    }

    /// Set the mapping in force on `as_of`, if any record covers it.
    #[must_use]
    pub fn with_mapping_records(mut self, records: &[MappingRecord], as_of: Date) -> Self {
        self.mapping = resolve_mapping(records, as_of).cloned();
        self
    }

    /// Fund identifier.
    #[must_use]
    pub const fn id(&self) -> &FundId {
        &self.id
    }

    /// Return stream at the fund's frequency.
    #[must_use]
    pub const fn stream(&self) -> &ReturnStream {
        &self.stream
    }

    /// Frequency of the stream.
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Current style mapping.
    #[must_use]
    pub const fn mapping(&self) -> Option<&StyleMapping> {
        self.mapping.as_ref()
    }

    /// Replace the mapping.
    pub fn set_mapping(&mut self, mapping: StyleMapping) {
        self.mapping = Some(mapping);
    }

    /// Drop the mapping.
    pub fn clear_mapping(&mut self) {
        self.mapping = None;
    }

    /// Align this fund with `basket` over `window`.
    ///
    /// # Errors
    /// See [`align`].
    pub fn align(
        &self,
        basket: &Basket,
        window: DateWindow,
    ) -> Result<Outcome<AlignedData>, ModelError> {
        align(&self.stream, basket, window, MIN_ALIGNED_OBSERVATIONS)
    }

    /// Regress the fund against `basket` and adopt the fitted mapping.
    ///
    /// Without enough overlap the current mapping is cleared.
    ///
    /// # Errors
    /// Returns `ModelError` for malformed input or a failed solve.
    pub fn regress(
        &mut self,
        regressor: &StyleRegressor,
        basket: &Basket,
        window: DateWindow,
    ) -> Result<Outcome<StyleMapping>, ModelError> {
        let outcome = regressor.regress(&self.stream, basket, window)?;
        match &outcome {
            Outcome::Ready(mapping) => {
                debug!(fund = %self.id, factors = mapping.len(), "adopted fitted mapping");
                self.mapping = Some(mapping.clone());
            }
            Outcome::NoResult(reason) => {
                info!(fund = %self.id, %reason, "regression skipped, mapping cleared");
                self.mapping = None;
            }
        }
        Ok(outcome)
    }

    /// Statistics for the current mapping over `window`.
    ///
    /// A missing or empty mapping is [`NoResult::UndefinedMapping`].
    ///
    /// Account value and delta are taken at the window start.
    ///
    /// # Errors
    /// Returns `ModelError` for malformed input or failed valuation lookups.
    pub fn stats(
        &self,
        basket: &Basket,
        window: DateWindow,
        valuations: &Valuations,
        config: &StatsConfig,
    ) -> Result<Outcome<StatsRecord>, ModelError> {
        let Some(mapping) = self.mapping.as_ref().filter(|m| !m.is_empty()) else {
            return Ok(Outcome::NoResult(NoResult::UndefinedMapping));
        };
        let aligned = match self.align(basket, window)? {
            Outcome::Ready(aligned) => aligned,
            Outcome::NoResult(reason) => return Ok(Outcome::NoResult(reason)),
        };

        let fit = FitStatistics::compute(&aligned, mapping, config)?;
        let account_value = valuations.fund_value(&self.id, window.start)?;
        let delta = valuations.delta_estimate(&self.id, window.start)?;
        Ok(Outcome::Ready(StatsRecord::new(
            self.id.clone(),
            window,
            fit,
            account_value,
            delta,
            config,
        )))
    }

    /// Fit on `train`, then report statistics for that mapping on `test`.
    ///
    /// # Errors
    /// See [`Fund::regress`] and [`Fund::stats`].
    pub fn backtest(
        &mut self,
        regressor: &StyleRegressor,
        basket: &Basket,
        train: DateWindow,
        test: DateWindow,
        valuations: &Valuations,
        config: &StatsConfig,
    ) -> Result<Outcome<StatsRecord>, ModelError> {
        if let Outcome::NoResult(reason) = self.regress(regressor, basket, train)? {
            return Ok(Outcome::NoResult(reason));
        }
        self.stats(basket, test, valuations, config)
    }

    /// Flag returns in `window` larger than `threshold` in magnitude.
    #[must_use]
    pub fn anomalies(&self, window: DateWindow, threshold: f64) -> AnomalyScan {
        detect_anomalies(&self.stream, window.start, window.end, threshold)
    }
}

impl ReturnSeries for Fund {
    fn start_dates(&self) -> &[Date] {
        self.stream.start_dates()
    }

    fn end_dates(&self) -> &[Date] {
        self.stream.end_dates()
    }

    fn returns(&self) -> &Array1<f64> {
        self.stream.returns()
    }
}
