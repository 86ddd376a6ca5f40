//! PoseKit Common Utilities
//!
//! Shared infrastructure for all PoseKit crates:
//! - Error types and result aliases
//! - Batch progress tracking
//! - Tracing/logging initialization
//! - Configuration loading

pub mod config;
pub mod error;
pub mod logging;
pub mod progress;

pub use config::*;
pub use error::*;
pub use progress::*;
