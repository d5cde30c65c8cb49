#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/stylefit/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod series;
pub use series::ReturnSeries;

mod estimator;
pub use estimator::{EstimatorError, StyleEstimator};

mod valuation;
pub use valuation::{
    ConstantLookup, DateCache, DateLookup, FundValueLookup, LookupError, fund_value_fn, lookup_fn,
};
