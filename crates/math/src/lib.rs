#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/stylefit/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod simplex;
pub use simplex::{SimplexLsqResult, SolverConfig, project_to_simplex, simplex_least_squares};

mod linalg;
pub use linalg::{equality_constrained_lsq, solve_linear_system};

mod descriptive;
pub use descriptive::{
    compound, correlation, covariance, geometric_mean, mean, std_dev, variance,
};

mod error;
pub use error::MathError;
