//! PoseKit Pose Model
//!
//! Defines the data contracts shared by the batch tools:
//! - **Landmarks:** normalized body keypoints with visibility scores
//! - **Skeleton:** the 33-point body topology used for drawing
//! - **Segmentation:** per-pixel foreground probability masks
//! - **Dump:** the plaintext landmark file written per detected image

pub mod dump;
pub mod landmark;
pub mod mask;
pub mod skeleton;

pub use dump::*;
pub use landmark::*;
pub use mask::*;
pub use skeleton::*;
