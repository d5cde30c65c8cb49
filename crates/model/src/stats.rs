//! Fit statistics for a style mapping.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use stylefit_math::{compound, correlation, covariance, geometric_mean, std_dev, variance};
use stylefit_primitives::{DateWindow, FundId, StyleMapping};

use crate::{AlignedData, ModelError};

/// Reporting conventions for fit statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Observations per year used to annualize volatility.
    pub trading_days_per_year: f64,
    /// Multiplier applied to the standard deviation of the return gap.
    pub tracking_error_scale: f64,
    /// Size of the shock the delta is quoted for, in percent units.
    pub pnl_shock_scale: f64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            trading_days_per_year: 252.0,
            tracking_error_scale: 10_000.0,
            pnl_shock_scale: 100.0,
        }
    }
}

impl StatsConfig {
    /// Check the configuration.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidConfig` if a scale is not positive and finite.
    pub fn validate(&self) -> Result<(), ModelError> {
        let checks = [
            ("trading_days_per_year", self.trading_days_per_year),
            ("tracking_error_scale", self.tracking_error_scale),
            ("pnl_shock_scale", self.pnl_shock_scale),
        ];
        for (name, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(ModelError::InvalidConfig(format!("{name} must be positive")));
            }
        }
        Ok(())
    }
}

/// How well a mapping tracks a fund over aligned observations.
///
/// Variances and covariances use the population convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitStatistics {
    /// Aligned observations used.
    pub observations: usize,
    /// Scaled standard deviation of actual minus projected returns.
    pub tracking_error: f64,
    /// `cov(projected, actual) / var(projected)`, 0 when the projection is flat.
    pub beta: f64,
    /// Geometric mean of the return gap.
    pub alpha: f64,
    /// Annualized standard deviation of actual returns.
    pub volatility: f64,
    /// Compounded projected return.
    pub projected_return: f64,
    /// Compounded actual return.
    pub actual_return: f64,
    /// `actual_return - projected_return`.
    pub difference: f64,
    /// Squared correlation of projected and actual returns.
    pub r_squared: f64,
}

impl FitStatistics {
    /// Compute statistics for `mapping` on `aligned`.
    ///
    /// Factors missing from the mapping get weight 0.
    ///
    /// # Errors
    /// Returns `ModelError::DimensionMismatch` if the aligned matrices disagree.
    pub fn compute(
        aligned: &AlignedData,
        mapping: &StyleMapping,
        config: &StatsConfig,
    ) -> Result<Self, ModelError> {
        if aligned.factors.ncols() != aligned.factor_names.len()
            || aligned.factors.nrows() != aligned.fund.len()
        {
            return Err(ModelError::DimensionMismatch(format!(
                "{:?} benchmark matrix for {} factors and {} fund returns",
                aligned.factors.dim(),
                aligned.factor_names.len(),
                aligned.fund.len()
            )));
        }

        let weights = Array1::from(mapping.weights_for(&aligned.factor_names));
        let projected = aligned.factors.dot(&weights);
        let actual = &aligned.fund;
        let gap = actual - &projected;

        let projected_variance = variance(&projected);
        let beta = if projected_variance > 0.0 {
            covariance(&projected, actual)? / projected_variance
        } else {
            0.0
        };

        let r_squared = if actual.iter().all(|&r| r == 0.0) {
            0.0
        } else {
            correlation(&projected, actual)?.map_or(0.0, |c| c * c)
        };

        let projected_return = compound(&projected);
        let actual_return = compound(actual);

        Ok(Self {
            observations: actual.len(),
            tracking_error: std_dev(&gap) * config.tracking_error_scale,
            beta,
            alpha: geometric_mean(&gap),
            volatility: std_dev(actual) * config.trading_days_per_year.sqrt(),
            projected_return,
            actual_return,
            difference: actual_return - projected_return,
            r_squared,
        })
    }
}

/// Statistics for one fund over one window, scaled into money terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsRecord {
    /// Fund the statistics describe.
    pub fund: FundId,
    /// Requested window.
    pub window: DateWindow,
    /// Fit statistics over the aligned observations.
    pub fit: FitStatistics,
    /// Fund account value at the window start.
    pub account_value: f64,
    /// Fund's estimated delta for a 1% shock at the window start.
    pub delta: f64,
    /// `delta * difference * pnl_shock_scale`.
    pub pnl: f64,
}

impl StatsRecord {
    /// Combine fit statistics with valuation inputs.
    #[must_use]
    pub fn new(
        fund: FundId,
        window: DateWindow,
        fit: FitStatistics,
        account_value: f64,
        delta: f64,
        config: &StatsConfig,
    ) -> Self {
        let pnl = delta * fit.difference * config.pnl_shock_scale;
        Self { fund, window, fit, account_value, delta, pnl }
    }
}
