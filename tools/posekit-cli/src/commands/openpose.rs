//! One-shot OpenPose run over an image directory.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use posekit_common::config::{config_file_path, AppConfig};
use posekit_invoker::{candidate_paths, run_openpose, InvocationOutput, InvokeError};

/// Exit status when no OpenPose executable is installed.
const EXIT_NOT_INSTALLED: u8 = 1;
/// Exit status when the input directory does not exist.
const EXIT_INPUT_MISSING: u8 = 2;

pub fn run(
    config: &AppConfig,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    binary: Option<PathBuf>,
) -> anyhow::Result<ExitCode> {
    let input = input
        .or_else(|| config.invoker.input_dir.clone())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No input directory. Pass --input or set invoker.input_dir in {}",
                config_file_path().display()
            )
        })?;
    let output = output.unwrap_or_else(|| config.invoker.resolved_output_dir(&input));

    let mut extra = Vec::new();
    extra.extend(binary);
    extra.extend(config.invoker.extra_candidates.iter().cloned());
    let candidates = candidate_paths(&extra);

    println!("Running OpenPose on: {}", input.display());
    let result = run_openpose(&input, &output, &candidates);
    report(&result, &output);
    Ok(ExitCode::from(exit_status(&result)))
}

/// Process exit status for an invocation outcome. Only missing
/// preconditions are fatal; a failed run has already been reported.
fn exit_status(result: &Result<InvocationOutput, InvokeError>) -> u8 {
    match result {
        Err(InvokeError::ExecutableNotFound { .. }) => EXIT_NOT_INSTALLED,
        Err(InvokeError::InputMissing { .. }) => EXIT_INPUT_MISSING,
        _ => 0,
    }
}

fn report(result: &Result<InvocationOutput, InvokeError>, output: &Path) {
    match result {
        Ok(result) => {
            if !result.stdout.is_empty() {
                println!("{}", result.stdout.trim_end());
            }
            if !result.stderr.is_empty() {
                println!("OpenPose warnings:");
                println!("{}", result.stderr.trim_end());
            }
            println!("\nOpenPose processing complete.");
            println!("Results saved to: {}", output.display());
        }
        Err(InvokeError::InputMissing { path }) => {
            println!("Error: input directory does not exist: {}", path.display());
        }
        Err(InvokeError::ExecutableNotFound { candidates }) => {
            println!("Error: OpenPose executable not found. Checked:");
            for path in candidates {
                println!("  - {}", path.display());
            }
            println!("\nInstall OpenPose from https://github.com/CMU-Perceptual-Computing-Lab/openpose");
            println!("or point --binary (or invoker.extra_candidates) at openpose.bin.");
        }
        Err(InvokeError::CommandFailed { status, stderr, .. }) => {
            println!("Error running OpenPose ({status}):");
            print!("{stderr}");
            if !stderr.ends_with('\n') {
                println!();
            }
            println!("\nCheck that:");
            println!("  - the OpenPose models are downloaded next to the executable");
            println!("  - CUDA and cuDNN versions match the build, if built with GPU support");
            println!("  - the input directory contains readable images");
        }
        Err(e) => {
            println!("Unexpected error: {e}");
        }
    }
}
