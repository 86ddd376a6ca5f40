//! PoseKit Estimator
//!
//! The single-image inference seam used by the batch processor, plus the
//! MediaPipe bridge: a worker process that loads the pose model once and
//! answers one JSON line per image (see [`protocol`]).

pub mod bridge;
pub mod protocol;
pub mod worker;

pub use bridge::{EstimateRequest, EstimatorError, PoseEstimator};
pub use worker::WorkerEstimator;
