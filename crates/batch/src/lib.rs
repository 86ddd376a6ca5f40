//! PoseKit Batch Processor
//!
//! Walks a directory of images in sorted order and, for each one:
//! - decodes it (undecodable files are skipped, not fatal)
//! - asks the pose estimator for landmarks
//! - renders the skeleton overlay, or copies the image untouched when no
//!   pose is found
//! - writes `pose_<name>` and, on detection, `landmarks_<stem>.txt`
//!
//! A failure on one image never aborts the batch.

pub mod artifact;
pub mod discover;
pub mod processor;

pub use artifact::{ArtifactPaths, PendingArtifacts};
pub use discover::{discover_images, is_recognized_image, IMAGE_EXTENSIONS};
pub use processor::{BatchProcessor, BatchSummary, ImageOutcome, ProgressCallback};
