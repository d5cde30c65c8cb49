//! Analysis configuration.

use serde::{Deserialize, Serialize};
use stylefit_primitives::{Frequency, ResampleOptions};
use stylefit_streams::DEFAULT_ANOMALY_THRESHOLD;

use crate::{ModelError, RegressionConfig, StatsConfig};

/// Settings for a full style analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Frequency funds and benchmarks are compared at.
    pub frequency: Frequency,
    /// Weekly bucket options.
    pub resample: ResampleOptions,
    /// Regression settings.
    pub regression: RegressionConfig,
    /// Statistics conventions.
    pub stats: StatsConfig,
    /// Absolute return above which an observation is flagged.
    pub anomaly_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frequency: Frequency::Daily,
            resample: ResampleOptions::default(),
            regression: RegressionConfig::default(),
            stats: StatsConfig::default(),
            anomaly_threshold: DEFAULT_ANOMALY_THRESHOLD,
        }
    }
}

impl AnalysisConfig {
    /// Check every section of the configuration.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidConfig` describing the first problem found.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.regression.min_observations == 0 {
            return Err(ModelError::InvalidConfig(
                "min_observations must be at least 1".to_string(),
            ));
        }
        self.regression.solver.validate()?;
        self.stats.validate()?;
        if !(self.anomaly_threshold.is_finite() && self.anomaly_threshold >= 0.0) {
            return Err(ModelError::InvalidConfig(
                "anomaly_threshold must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
