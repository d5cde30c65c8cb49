#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/stylefit/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod stream;
pub use stream::ReturnStream;

mod basic;
pub use basic::{BasicStream, build_stream};

mod ops;
pub use ops::StreamOps;

mod resample;
pub use resample::resample_dates;

mod calendar;
pub use calendar::{MIN_ALIGNED_OBSERVATIONS, overlap, overlap_all};

mod combine;
pub use combine::{add_streams, hybrid_stream, max_streams, subtract_streams};

mod anomaly;
pub use anomaly::{AnomalyScan, DEFAULT_ANOMALY_THRESHOLD, detect_anomalies};

mod period;
pub use period::{basket_period_returns, period_return};

mod error;
pub use error::StreamError;
