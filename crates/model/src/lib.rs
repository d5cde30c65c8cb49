#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/stylefit/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod outcome;
pub use outcome::{NoResult, Outcome};

mod basket;
pub use basket::Basket;

mod align;
pub use align::{AlignedData, align};

mod regression;
pub use regression::{RegressionConfig, StyleRegressor};

mod stats;
pub use stats::{FitStatistics, StatsConfig, StatsRecord};

mod cache;
pub use cache::{MemoCache, Valuations};

mod fund;
pub use fund::Fund;

mod batch;
pub use batch::{BatchResult, run_batch, scan_batch};

mod report;
pub use report::{StatsSummary, stats_frame};

mod config;
pub use config::AnalysisConfig;

mod error;
pub use error::ModelError;

/// Re-export commonly used types.
pub mod prelude {
    pub use stylefit_traits::{ReturnSeries, StyleEstimator};

    pub use super::{
        AnalysisConfig, Basket, Fund, ModelError, NoResult, Outcome, StatsRecord, StyleRegressor,
        Valuations,
    };
}
