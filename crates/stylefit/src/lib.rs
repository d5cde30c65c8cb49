//! # stylefit
//!
//! Returns-based style analysis.
//!
//! This crate provides a unified interface to the stylefit workspace: return
//! stream algebra, calendar alignment, constrained style regression and fit
//! statistics. Individual components can be enabled via feature flags.
//!
//! ## Features
//!
//! - `full` (default): Enables all components
//! - `primitives`: Dates, quotes, style mappings and windows
//! - `traits`: Trait abstractions
//! - `math`: Simplex-constrained least squares and descriptive statistics
//! - `streams`: Return streams, resampling and alignment
//! - `model`: Funds, regression, statistics and valuation caches
//! - `utils`: DataFrame views
//! - `cli`: The `analyze` binary
//!
//! ## Example
//!
//! ```rust,ignore
//! use stylefit::model::prelude::*;
//! use stylefit::primitives::{DateWindow, Frequency, FundId, ResampleOptions};
//!
//! let mut fund = Fund::from_quotes(id, nav, Frequency::Weekly, ResampleOptions::default())?;
//! let outcome = fund.regress(&StyleRegressor::new(), &basket, window)?;
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(feature = "primitives")]
#[doc(inline)]
pub use stylefit_primitives as primitives;
#[cfg(feature = "traits")]
#[doc(inline)]
pub use stylefit_traits as traits;
#[cfg(feature = "math")]
#[doc(inline)]
pub use stylefit_math as math;
#[cfg(feature = "streams")]
#[doc(inline)]
pub use stylefit_streams as streams;
#[cfg(feature = "model")]
#[doc(inline)]
pub use stylefit_model as model;
#[cfg(feature = "utils")]
#[doc(inline)]
pub use stylefit_utils as utils;
