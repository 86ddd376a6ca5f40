//! The estimator seam the batch processor calls into.

use std::path::Path;

use image::RgbImage;
use posekit_common::error::PosekitError;
use posekit_pose_model::PoseDetection;

/// One image handed to an estimator.
#[derive(Debug, Clone, Copy)]
pub struct EstimateRequest<'a> {
    /// File the image was decoded from.
    pub path: &'a Path,

    /// Decoded pixels, RGB order.
    pub image: &'a RgbImage,
}

impl<'a> EstimateRequest<'a> {
    pub fn new(path: &'a Path, image: &'a RgbImage) -> Self {
        Self { path, image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Single-image pose inference.
///
/// Implementations load their model when constructed and release it when
/// dropped; one instance serves a whole batch.
pub trait PoseEstimator {
    /// Run inference on one image. `Ok(None)` means no pose was found.
    fn estimate(
        &mut self,
        request: &EstimateRequest<'_>,
    ) -> Result<Option<PoseDetection>, EstimatorError>;

    /// Estimator name for logs.
    fn name(&self) -> &str;
}

/// Errors raised by estimator backends.
#[derive(Debug, thiserror::Error)]
pub enum EstimatorError {
    #[error("worker command is empty")]
    EmptyCommand,

    #[error("failed to start worker `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("worker exited before becoming ready: {detail}")]
    NotReady { detail: String },

    #[error("worker exited unexpectedly")]
    WorkerGone,

    #[error("malformed worker response: {message}")]
    Protocol { message: String },

    #[error("worker failed on {path}: {message}")]
    Inference { path: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<EstimatorError> for PosekitError {
    fn from(err: EstimatorError) -> Self {
        PosekitError::estimator(err.to_string())
    }
}
