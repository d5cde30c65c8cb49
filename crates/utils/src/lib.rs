#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/stylefit/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod frames;
pub use frames::{anomaly_frame, basket_frame, mapping_frame, stream_frame};

mod quotes;
pub use quotes::quotes_from_frame;

mod error;
pub use error::UtilsError;
