//! Sequential batch processing with per-image failure isolation.

use std::path::{Path, PathBuf};

use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader, RgbImage};

use posekit_common::error::{PosekitError, PosekitResult};
use posekit_common::progress::{BatchProgress, ProgressReport};
use posekit_estimator::{EstimateRequest, PoseEstimator};
use posekit_pose_model::render_landmarks;
use posekit_render_engine::{render_detection, OverlayStyle};

use crate::artifact::{ArtifactPaths, PendingArtifacts};
use crate::discover::discover_images;

/// Progress callback, invoked after each image with the file just handled.
pub type ProgressCallback = Box<dyn Fn(&Path, ProgressReport)>;

/// What happened to a single image that was processed without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOutcome {
    /// Pose found: overlay image and landmark dump written.
    Rendered { landmarks: usize },

    /// No pose found: the source was copied unchanged.
    NoPose,
}

/// Totals for one batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    /// Recognized images found in the input directory.
    pub discovered: usize,

    /// Output images written (rendered or copied).
    pub images_written: usize,

    /// Landmark dumps written.
    pub landmark_files: usize,

    /// Images on which no pose was found.
    pub no_pose: usize,

    /// Files that could not be decoded.
    pub skipped: usize,

    /// Images that decoded but failed later.
    pub failed: usize,

    /// Per-file diagnostics for skipped and failed images.
    pub failures: Vec<(PathBuf, String)>,
}

impl BatchSummary {
    /// Whether every discovered image produced an output.
    pub fn is_clean(&self) -> bool {
        self.skipped == 0 && self.failed == 0
    }
}

/// Runs a pose estimator over every image of a directory.
///
/// The processor owns its estimator for the whole batch; dropping the
/// processor releases it.
pub struct BatchProcessor<E: PoseEstimator> {
    estimator: E,
    style: OverlayStyle,
}

impl<E: PoseEstimator> BatchProcessor<E> {
    pub fn new(estimator: E) -> Self {
        Self {
            estimator,
            style: OverlayStyle::default(),
        }
    }

    /// Override the overlay style.
    pub fn with_style(mut self, style: OverlayStyle) -> Self {
        self.style = style;
        self
    }

    /// Process every recognized image in `input_dir` into `output_dir`.
    ///
    /// A missing or empty input directory is reported as a warning and
    /// yields an empty summary. Only failure to create the output
    /// directory aborts the run; per-image errors are collected instead.
    pub fn run(
        &mut self,
        input_dir: &Path,
        output_dir: &Path,
        progress: Option<ProgressCallback>,
    ) -> PosekitResult<BatchSummary> {
        let images = match discover_images(input_dir) {
            Ok(images) => images,
            Err(PosekitError::DirectoryNotFound { path }) => {
                tracing::warn!(dir = %path.display(), "Input directory does not exist");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let mut summary = BatchSummary {
            discovered: images.len(),
            ..BatchSummary::default()
        };

        if images.is_empty() {
            tracing::warn!(dir = %input_dir.display(), "No images found");
            return Ok(summary);
        }

        std::fs::create_dir_all(output_dir)?;

        tracing::info!(
            count = images.len(),
            input = %input_dir.display(),
            output = %output_dir.display(),
            estimator = self.estimator.name(),
            "Starting batch"
        );

        let mut tracker = BatchProgress::start(images.len());
        for path in &images {
            match self.process_image(path, output_dir) {
                Ok(ImageOutcome::Rendered { landmarks }) => {
                    tracing::debug!(file = %path.display(), landmarks, "Pose rendered");
                    summary.images_written += 1;
                    summary.landmark_files += 1;
                }
                Ok(ImageOutcome::NoPose) => {
                    tracing::debug!(file = %path.display(), "No pose detected");
                    summary.images_written += 1;
                    summary.no_pose += 1;
                }
                Err(e @ PosekitError::Decode { .. }) => {
                    tracing::warn!(file = %path.display(), "Skipping unreadable image: {e}");
                    summary.skipped += 1;
                    summary.failures.push((path.clone(), e.to_string()));
                }
                Err(e) => {
                    tracing::error!(file = %path.display(), "Failed to process image: {e}");
                    summary.failed += 1;
                    summary.failures.push((path.clone(), e.to_string()));
                }
            }

            let report = tracker.advance();
            tracing::trace!(
                done = report.done,
                total = report.total,
                eta_secs = report.eta_secs,
                "Batch progress"
            );
            if let Some(cb) = &progress {
                cb(path, report);
            }
        }

        tracing::info!(
            written = summary.images_written,
            landmark_files = summary.landmark_files,
            no_pose = summary.no_pose,
            skipped = summary.skipped,
            failed = summary.failed,
            started = tracker.started_wall(),
            elapsed_secs = tracker.report().elapsed_secs,
            "Batch complete"
        );

        Ok(summary)
    }

    /// Decode, estimate, render and write the artifacts for one image.
    pub fn process_image(&mut self, source: &Path, output_dir: &Path) -> PosekitResult<ImageOutcome> {
        let image = decode_image(source)?;
        let paths = ArtifactPaths::for_source(source, output_dir)?;

        let detection = self
            .estimator
            .estimate(&EstimateRequest::new(source, &image))?;

        let (pending, outcome) = match detection {
            None => (PendingArtifacts::copy_of(source)?, ImageOutcome::NoPose),
            Some(detection) => {
                let rendered = render_detection(&image, &detection, &self.style)?;
                let dump = render_landmarks(&detection.landmark_set(image.width(), image.height()));
                (
                    PendingArtifacts::rendered(&rendered, &paths.image, dump)?,
                    ImageOutcome::Rendered {
                        landmarks: detection.landmarks.len(),
                    },
                )
            }
        };

        pending.commit(&paths)?;
        Ok(outcome)
    }
}

/// Decode an image upright: the format is guessed from its content and
/// any EXIF orientation is applied, matching what the estimator sees.
pub fn decode_image(path: &Path) -> PosekitResult<RgbImage> {
    let decode_err = |e: image::ImageError| PosekitError::decode(path, e.to_string());
    let mut decoder = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| PosekitError::decode(path, e.to_string()))?
        .into_decoder()
        .map_err(decode_err)?;
    let orientation = decoder.orientation().unwrap_or_else(|e| {
        tracing::debug!(file = %path.display(), "Ignoring unreadable orientation: {e}");
        Orientation::NoTransforms
    });
    let mut image = DynamicImage::from_decoder(decoder).map_err(decode_err)?;
    image.apply_orientation(orientation);
    Ok(image.to_rgb8())
}
