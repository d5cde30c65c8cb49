#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/stylefit/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod factor;
pub use factor::{FactorName, FundId};

mod quotes;
pub use quotes::{QuoteSeries, ensure_increasing};

mod mapping;
pub use mapping::{MappingRecord, StyleMapping, resolve_mapping};

mod frequency;
pub use frequency::{Frequency, ResampleOptions};

mod window;
pub use window::DateWindow;

mod error;
pub use error::PrimitivesError;

/// Re-export common date type.
pub type Date = chrono::NaiveDate;

/// Re-export weekday type used for weekly anchors.
pub type Weekday = chrono::Weekday;
