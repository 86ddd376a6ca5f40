//! MediaPipe bridge backed by a long-lived worker process.
//!
//! The worker is spawned once and loads its model before printing the
//! ready line. Each image is one request line and one response line.
//! Dropping the estimator closes the worker's stdin and waits for it.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, ExitStatus, Stdio};

use posekit_common::config::EstimatorSettings;
use posekit_pose_model::PoseDetection;

use crate::bridge::{EstimateRequest, EstimatorError, PoseEstimator};
use crate::protocol::{settings_env, ImageRequest, ImageResponse, ReadyMessage};

/// Pose estimator that delegates inference to a worker process.
pub struct WorkerEstimator {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    stderr_task: Option<std::thread::JoinHandle<()>>,
    model: String,
    line: String,
}

impl WorkerEstimator {
    /// Spawn `command` and wait until its model is loaded.
    pub fn spawn(command: &[String], settings: &EstimatorSettings) -> Result<Self, EstimatorError> {
        let (program, args) = command.split_first().ok_or(EstimatorError::EmptyCommand)?;

        tracing::debug!(program = %program, args = ?args, "Starting pose worker");
        let mut child = Command::new(program)
            .args(args)
            .envs(settings_env(settings))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| EstimatorError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Forward worker diagnostics so a full stderr pipe never stalls it.
        let stderr_task = stderr.map(|stderr| {
            std::thread::spawn(move || {
                for line in BufReader::new(stderr).lines().map_while(Result::ok) {
                    tracing::debug!(target: "posekit_estimator::worker", "{line}");
                }
            })
        });

        let stdout = match stdout {
            Some(stdout) => BufReader::new(stdout),
            None => {
                let _ = child.kill();
                return Err(EstimatorError::NotReady {
                    detail: "worker stdout not captured".to_string(),
                });
            }
        };

        let mut estimator = Self {
            child,
            stdin,
            stdout,
            stderr_task,
            model: String::new(),
            line: String::new(),
        };
        estimator.await_ready()?;

        tracing::info!(pid = estimator.child.id(), model = %estimator.model, "Pose worker ready");
        Ok(estimator)
    }

    /// Model description reported by the worker.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Close the worker and wait for it to exit.
    pub fn shutdown(mut self) -> Result<ExitStatus, EstimatorError> {
        self.close()
    }

    fn await_ready(&mut self) -> Result<(), EstimatorError> {
        if !self.read_line()? {
            let status = self.child.wait()?;
            return Err(EstimatorError::NotReady {
                detail: format!("worker exited with {status} before printing a ready line"),
            });
        }

        let ready: ReadyMessage =
            serde_json::from_str(self.line.trim()).map_err(|e| EstimatorError::NotReady {
                detail: format!("unexpected first line `{}`: {e}", self.line.trim()),
            })?;
        if !ready.ready {
            return Err(EstimatorError::NotReady {
                detail: "worker reported ready=false".to_string(),
            });
        }
        self.model = ready.model.unwrap_or_else(|| "unknown model".to_string());
        Ok(())
    }

    /// Read one line into `self.line`. Returns false on EOF.
    fn read_line(&mut self) -> Result<bool, EstimatorError> {
        self.line.clear();
        let bytes = self.stdout.read_line(&mut self.line)?;
        Ok(bytes > 0)
    }

    fn close(&mut self) -> Result<ExitStatus, EstimatorError> {
        // EOF on stdin tells the worker to release its model and exit.
        drop(self.stdin.take());
        let status = self.child.wait()?;
        if let Some(task) = self.stderr_task.take() {
            let _ = task.join();
        }
        Ok(status)
    }
}

impl PoseEstimator for WorkerEstimator {
    fn estimate(
        &mut self,
        request: &EstimateRequest<'_>,
    ) -> Result<Option<PoseDetection>, EstimatorError> {
        let absolute = request
            .path
            .canonicalize()
            .unwrap_or_else(|_| request.path.to_path_buf());
        let path = absolute.to_string_lossy();

        let stdin = self.stdin.as_mut().ok_or(EstimatorError::WorkerGone)?;
        let payload = serde_json::to_string(&ImageRequest { image: &path }).map_err(|e| {
            EstimatorError::Protocol {
                message: e.to_string(),
            }
        })?;
        writeln!(stdin, "{payload}").map_err(|_| EstimatorError::WorkerGone)?;
        stdin.flush().map_err(|_| EstimatorError::WorkerGone)?;

        if !self.read_line()? {
            return Err(EstimatorError::WorkerGone);
        }

        let response: ImageResponse =
            serde_json::from_str(self.line.trim()).map_err(|e| EstimatorError::Protocol {
                message: format!("{e}"),
            })?;
        response.into_detection(&path)
    }

    fn name(&self) -> &str {
        "mediapipe-worker"
    }
}

impl Drop for WorkerEstimator {
    fn drop(&mut self) {
        if self.stdin.is_none() && self.stderr_task.is_none() {
            return;
        }
        match self.close() {
            Ok(status) if status.success() => tracing::debug!("Pose worker released"),
            Ok(status) => tracing::warn!(%status, "Pose worker exited with failure"),
            Err(e) => tracing::warn!("Failed to release pose worker: {e}"),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::path::Path;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), script.to_string()]
    }

    #[test]
    fn test_spawn_reads_ready_line() {
        let worker = WorkerEstimator::spawn(
            &sh(r#"echo '{"ready": true, "model": "fake"}'; cat > /dev/null"#),
            &EstimatorSettings::default(),
        )
        .unwrap();
        assert_eq!(worker.model(), "fake");
        assert!(worker.shutdown().unwrap().success());
    }

    #[test]
    fn test_settings_reach_worker_environment() {
        let script = r#"echo "{\"ready\": true, \"model\": \"complexity $POSEKIT_MODEL_COMPLEXITY\"}"; cat > /dev/null"#;
        let worker = WorkerEstimator::spawn(&sh(script), &EstimatorSettings::default()).unwrap();
        assert_eq!(worker.model(), "complexity 2");
    }

    #[test]
    fn test_worker_exit_before_ready_is_error() {
        let err = WorkerEstimator::spawn(&sh("exit 3"), &EstimatorSettings::default())
            .err()
            .unwrap();
        assert!(matches!(err, EstimatorError::NotReady { .. }));
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let err = WorkerEstimator::spawn(
            &["/nonexistent/posekit-worker".to_string()],
            &EstimatorSettings::default(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, EstimatorError::Spawn { .. }));
    }

    #[test]
    fn test_empty_command_rejected() {
        let err = WorkerEstimator::spawn(&[], &EstimatorSettings::default())
            .err()
            .unwrap();
        assert!(matches!(err, EstimatorError::EmptyCommand));
    }

    #[test]
    fn test_estimate_round_trips_one_request_per_image() {
        let script = r#"
            echo '{"ready": true}'
            while read line; do
                echo '{"landmarks": [{"x": 0.5, "y": 0.5, "z": 0.0, "visibility": 0.9}]}'
            done
        "#;
        let mut worker = WorkerEstimator::spawn(&sh(script), &EstimatorSettings::default()).unwrap();
        let image = RgbImage::new(4, 4);
        let request = EstimateRequest::new(Path::new("frame.png"), &image);

        for _ in 0..2 {
            let detection = worker.estimate(&request).unwrap().unwrap();
            assert_eq!(detection.landmarks.len(), 1);
            assert_eq!(detection.landmarks[0].x, 0.5);
        }
    }

    #[test]
    fn test_worker_dying_mid_batch_is_reported() {
        let script = r#"echo '{"ready": true}'; read line; exit 0"#;
        let mut worker = WorkerEstimator::spawn(&sh(script), &EstimatorSettings::default()).unwrap();
        let image = RgbImage::new(1, 1);
        let request = EstimateRequest::new(Path::new("frame.png"), &image);

        assert!(matches!(
            worker.estimate(&request),
            Err(EstimatorError::WorkerGone)
        ));
    }
}
