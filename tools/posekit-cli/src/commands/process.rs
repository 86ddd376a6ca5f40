//! Batch image processing through the MediaPipe worker.

use std::io::Write;
use std::path::{Path, PathBuf};

use posekit_batch::{BatchProcessor, BatchSummary, ProgressCallback};
use posekit_common::config::{config_file_path, AppConfig};
use posekit_common::progress::ProgressReport;
use posekit_estimator::WorkerEstimator;

pub fn run(config: &AppConfig, input: Option<PathBuf>, output: Option<PathBuf>) -> anyhow::Result<()> {
    let input = input
        .or_else(|| config.processor.input_dir.clone())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No input directory. Pass --input or set processor.input_dir in {}",
                config_file_path().display()
            )
        })?;
    let output = output.unwrap_or_else(|| config.processor.resolved_output_dir(&input));

    println!("Initializing pose estimator...");
    let estimator =
        match WorkerEstimator::spawn(&config.processor.worker, &config.processor.estimator) {
            Ok(estimator) => estimator,
            Err(e) => {
                println!("\nFailed to start pose estimator: {e}");
                println!("Worker command: {}", config.processor.worker.join(" "));
                return Ok(());
            }
        };
    println!("  Model: {}", estimator.model());

    let progress_cb: ProgressCallback = Box::new(|path: &Path, p: ProgressReport| {
        print!(
            "\r  Progress: {:.1}% ({}/{} images, ETA: {:.0}s) {}  ",
            p.fraction * 100.0,
            p.done,
            p.total,
            p.eta_secs,
            path.file_name().unwrap_or_default().to_string_lossy(),
        );
        let _ = std::io::stdout().flush();
    });

    println!("Processing images in: {}", input.display());
    let mut processor = BatchProcessor::new(estimator);
    match processor.run(&input, &output, Some(progress_cb)) {
        Ok(summary) if summary.discovered == 0 => {
            println!("Warning: no images found in {}", input.display());
        }
        Ok(summary) => {
            println!();
            print_summary(&summary);
            println!("\nDone. Results saved to: {}", output.display());
        }
        Err(e) => {
            println!("\nBatch failed: {e}");
        }
    }

    Ok(())
}

fn print_summary(summary: &BatchSummary) {
    println!("  Images found: {}", summary.discovered);
    println!("  Images written: {}", summary.images_written);
    println!("  Landmark files: {}", summary.landmark_files);
    println!("  No pose detected: {}", summary.no_pose);
    if !summary.is_clean() {
        println!(
            "  Skipped (unreadable): {}  Failed: {}",
            summary.skipped, summary.failed
        );
        for (path, reason) in &summary.failures {
            println!("    - {}: {reason}", path.display());
        }
    }
}
