//! Constrained style regression.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use stylefit_math::{SolverConfig, simplex_least_squares};
use stylefit_primitives::{DateWindow, StyleMapping};
use stylefit_streams::MIN_ALIGNED_OBSERVATIONS;
use stylefit_traits::{EstimatorError, ReturnSeries, StyleEstimator};
use tracing::debug;

use crate::{AlignedData, Basket, ModelError, Outcome, align};

/// Configuration for the style regressor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionConfig {
    /// Fewest aligned observations to attempt a fit.
    pub min_observations: usize,
    /// Solver settings.
    pub solver: SolverConfig,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self { min_observations: MIN_ALIGNED_OBSERVATIONS, solver: SolverConfig::default() }
    }
}

/// Fits non-negative benchmark weights summing to one.
///
/// Minimizes the squared gap between fund returns and the weighted
/// benchmark returns. The solver always starts from full weight on the
/// first benchmark column so repeated fits are reproducible.
#[derive(Debug, Clone, Default)]
pub struct StyleRegressor {
    config: RegressionConfig,
}

impl StyleRegressor {
    /// Create a new regressor with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &RegressionConfig {
        &self.config
    }

    /// Fit weights to already aligned data.
    ///
    /// # Errors
    /// Returns `ModelError` if the solve fails or the weights are invalid.
    pub fn fit(&self, aligned: &AlignedData) -> Result<StyleMapping, ModelError> {
        let (weights, _) = self.estimate(&aligned.fund, &aligned.factors)?;
        let mapping = StyleMapping::new(
            aligned
                .factor_names
                .iter()
                .cloned()
                .zip(weights.iter().map(|w| w.clamp(0.0, 1.0))),
        )?;
        Ok(mapping)
    }

    /// Regress a fund against a basket over `window`.
    ///
    /// # Errors
    /// Returns `ModelError` for malformed input or a failed solve. Too little
    /// common history is reported through [`Outcome::NoResult`].
    pub fn regress<S>(
        &self,
        fund: &S,
        basket: &Basket,
        window: DateWindow,
    ) -> Result<Outcome<StyleMapping>, ModelError>
    where
        S: ReturnSeries + ?Sized,
    {
        let aligned = match align(fund, basket, window, self.config.min_observations)? {
            Outcome::Ready(aligned) => aligned,
            Outcome::NoResult(reason) => return Ok(Outcome::NoResult(reason)),
        };
        self.fit(&aligned).map(Outcome::Ready)
    }
}

impl StyleEstimator for StyleRegressor {
    type Config = RegressionConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn estimate(
        &self,
        fund: &Array1<f64>,
        factors: &Array2<f64>,
    ) -> Result<(Array1<f64>, Array1<f64>), EstimatorError> {
        let n = fund.len();
        let k = factors.ncols();

        if factors.nrows() != n {
            return Err(EstimatorError::DimensionMismatch {
                expected: n,
                actual: factors.nrows(),
                context: "benchmark returns".to_string(),
            });
        }
        if k == 0 {
            return Err(EstimatorError::NoFactors);
        }
        if n < self.config.min_observations {
            return Err(EstimatorError::InsufficientData {
                required: self.config.min_observations,
                actual: n,
            });
        }

        let mut seed = Array1::zeros(k);
        seed[0] = 1.0;

        let result = simplex_least_squares(factors, fund, &seed, &self.config.solver)
            .map_err(|e| EstimatorError::LinearAlgebra(e.to_string()))?;

        debug!(
            observations = n,
            factors = k,
            iterations = result.iterations,
            sse = result.sse,
            "style regression solved"
        );

        Ok((result.weights, result.residuals))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;
    use stylefit_primitives::{Date, FactorName, QuoteSeries};
    use stylefit_streams::build_stream;

    use super::*;
    use crate::NoResult;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 5, day).unwrap()
    }

    fn compound_quotes(returns: &[f64]) -> Vec<f64> {
        let mut level = 100.0;
        let mut quotes = vec![level];
        for r in returns {
            level *= 1.0 + r;
            quotes.push(level);
        }
        quotes
    }

    #[test]
    fn regression_config_defaults() {
        let config = RegressionConfig::default();
        assert_eq!(config.min_observations, 3);
        assert_eq!(config.solver, SolverConfig::default());
    }

    #[test]
    fn single_factor_gets_full_weight() {
        let regressor = StyleRegressor::new();
        let fund = array![0.01, 0.03, -0.02, 0.00];
        let factors = array![[0.02], [0.01], [-0.01], [0.005]];
        let (weights, residuals) = regressor.estimate(&fund, &factors).unwrap();
        assert_eq!(weights[0], 1.0);
        assert_eq!(residuals.len(), 4);
    }

    #[test]
    fn estimator_rejects_short_history() {
        let regressor = StyleRegressor::new();
        let err = regressor.estimate(&array![0.01, 0.02], &array![[0.01], [0.02]]).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn estimator_rejects_dimension_mismatch() {
        let regressor = StyleRegressor::new();
        let err =
            regressor.estimate(&array![0.01, 0.02, 0.0], &array![[0.01], [0.02]]).unwrap_err();
        assert!(matches!(err, EstimatorError::DimensionMismatch { .. }));
    }

    #[test]
    fn regress_recovers_blend() {
        let spx = [0.010, -0.020, 0.015, 0.005, -0.007, 0.012, 0.003, -0.004];
        let agg = [0.002, 0.001, -0.003, 0.004, 0.000, -0.002, 0.003, 0.001];
        let fund: Vec<f64> = spx.iter().zip(&agg).map(|(s, a)| 0.6 * s + 0.4 * a).collect();
        let dates: Vec<Date> = (1..=9).map(d).collect();

        let fund = build_stream(dates.clone(), compound_quotes(&fund)).unwrap();
        let basket = Basket::from_quotes([
            (FactorName::SPX, QuoteSeries::new(dates.clone(), compound_quotes(&spx)).unwrap()),
            (FactorName::AGG, QuoteSeries::new(dates, compound_quotes(&agg)).unwrap()),
        ]);

        let window = DateWindow::new(d(1), d(9)).unwrap();
        let mapping =
            StyleRegressor::new().regress(&fund, &basket, window).unwrap().ready().unwrap();
        assert_relative_eq!(mapping.weight("SPX"), 0.6, epsilon = 1e-6);
        assert_relative_eq!(mapping.weight("AGG"), 0.4, epsilon = 1e-6);
        assert_relative_eq!(mapping.total(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn regress_without_overlap_is_no_result() {
        let fund = build_stream(vec![d(1), d(2), d(3)], vec![1.0, 1.1, 1.2]).unwrap();
        let basket = Basket::from_quotes([(
            FactorName::SPX,
            QuoteSeries::new(vec![d(2), d(3), d(4)], vec![1.0, 1.0, 1.0]).unwrap(),
        )]);
        let window = DateWindow::new(d(1), d(4)).unwrap();
        let outcome = StyleRegressor::new().regress(&fund, &basket, window).unwrap();
        assert_eq!(
            outcome.reason(),
            Some(NoResult::InsufficientOverlap { observations: 1, required: 3 })
        );
    }
}
