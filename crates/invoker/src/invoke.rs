//! One-shot OpenPose invocation over an image directory.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use posekit_common::error::PosekitError;

use crate::locate::locate_executable;

/// Errors from [`run_openpose`].
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    #[error("input directory does not exist: {}", path.display())]
    InputMissing { path: PathBuf },

    #[error("no OpenPose executable found (checked {} locations)", candidates.len())]
    ExecutableNotFound { candidates: Vec<PathBuf> },

    #[error("failed to create output directory {}: {source}", path.display())]
    CreateOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to run {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("OpenPose exited with {status}")]
    CommandFailed {
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },
}

impl From<InvokeError> for PosekitError {
    fn from(err: InvokeError) -> Self {
        PosekitError::invoker(err.to_string())
    }
}

/// A fully resolved OpenPose run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationPlan {
    pub executable: PathBuf,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

/// Captured result of a successful run.
#[derive(Debug, Clone)]
pub struct InvocationOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl InvocationPlan {
    pub fn new(
        executable: impl Into<PathBuf>,
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            executable: executable.into(),
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Arguments passed to the executable: read every image in the input
    /// directory, write rendered images, never open a display window.
    pub fn args(&self) -> Vec<OsString> {
        vec![
            "--image_dir".into(),
            self.input_dir.clone().into_os_string(),
            "--write_images".into(),
            self.output_dir.clone().into_os_string(),
            "--display".into(),
            "0".into(),
            "--render_pose".into(),
            "1".into(),
        ]
    }

    /// Printable command line, for reporting only.
    pub fn command_line(&self) -> String {
        std::iter::once(self.executable.as_os_str().to_os_string())
            .chain(self.args())
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Create the output directory and run the executable once, blocking
    /// until it exits. Both output streams are captured.
    pub fn execute(&self) -> Result<InvocationOutput, InvokeError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| InvokeError::CreateOutput {
            path: self.output_dir.clone(),
            source,
        })?;

        tracing::info!(command = %self.command_line(), "Running OpenPose");
        let start = std::time::Instant::now();
        let output = Command::new(&self.executable)
            .args(self.args())
            .stdin(Stdio::null())
            .output()
            .map_err(|source| InvokeError::Spawn {
                program: self.executable.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        tracing::info!(
            status = %output.status,
            elapsed_secs = start.elapsed().as_secs_f64(),
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "OpenPose finished"
        );

        if !output.status.success() {
            return Err(InvokeError::CommandFailed {
                status: output.status,
                stdout,
                stderr,
            });
        }

        Ok(InvocationOutput {
            status: output.status,
            stdout,
            stderr,
        })
    }
}

/// Resolve and run OpenPose over `input_dir`.
///
/// Preconditions are checked before anything touches the filesystem: a
/// missing input directory or executable leaves `output_dir` untouched.
pub fn run_openpose(
    input_dir: &Path,
    output_dir: &Path,
    candidates: &[PathBuf],
) -> Result<InvocationOutput, InvokeError> {
    let plan = resolve_plan(input_dir, output_dir, candidates)?;
    plan.execute()
}

/// Check preconditions and build the plan without running anything.
pub fn resolve_plan(
    input_dir: &Path,
    output_dir: &Path,
    candidates: &[PathBuf],
) -> Result<InvocationPlan, InvokeError> {
    if !input_dir.is_dir() {
        return Err(InvokeError::InputMissing {
            path: input_dir.to_path_buf(),
        });
    }

    let executable = locate_executable(candidates).ok_or_else(|| InvokeError::ExecutableNotFound {
        candidates: candidates.to_vec(),
    })?;

    Ok(InvocationPlan::new(executable, input_dir, output_dir))
}
