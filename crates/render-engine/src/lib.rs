//! PoseKit Render Engine
//!
//! Draws a detected pose onto a copy of the source image:
//!
//! ```text
//! source image ──┐
//!                ├── Connection lines (skeleton topology)
//! landmarks ─────┘         │
//!                          ├── Keypoint markers
//!                          │         │
//! segmentation mask ───────┴─────────┴── Alpha blend (grayscale, low opacity)
//!                                              │
//!                                              ▼
//!                                        rendered image
//! ```

pub mod overlay;

pub use overlay::*;
