//! PoseKit Invoker
//!
//! Hands a whole image directory to an external OpenPose executable:
//! find the first installed candidate, create the output directory, run
//! the executable once with display off and rendering on, and capture
//! what it prints. The layout of the produced files is left to OpenPose.

pub mod invoke;
pub mod locate;

pub use invoke::{resolve_plan, run_openpose, InvocationOutput, InvocationPlan, InvokeError};
pub use locate::{candidate_paths, locate_executable, DEFAULT_CANDIDATES};
