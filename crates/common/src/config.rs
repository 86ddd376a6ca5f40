//! Application configuration.
//!
//! Input and output directories are supplied here or on the command line;
//! nothing machine-specific is baked into the binaries.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Batch image processor settings.
    pub processor: ProcessorConfig,

    /// OpenPose invoker settings.
    pub invoker: InvokerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Settings for the per-image MediaPipe batch processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Directory of source images.
    pub input_dir: Option<PathBuf>,

    /// Directory for rendered images and landmark dumps.
    /// Defaults to `<input_dir>/output2`.
    pub output_dir: Option<PathBuf>,

    /// Worker command speaking the estimator line protocol,
    /// e.g. `["python3", "scripts/mediapipe_worker.py"]`.
    pub worker: Vec<String>,

    /// Model settings forwarded to the worker.
    pub estimator: EstimatorSettings,
}

/// Pose model settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorSettings {
    /// Treat every input as an unrelated still image.
    pub static_image_mode: bool,

    /// Model complexity (0, 1 or 2; 2 is the most accurate).
    pub model_complexity: u8,

    /// Request a segmentation mask alongside landmarks.
    pub enable_segmentation: bool,

    pub min_detection_confidence: f32,

    pub min_tracking_confidence: f32,
}

/// Settings for the OpenPose executable invoker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvokerConfig {
    /// Directory of source images handed to the executable.
    pub input_dir: Option<PathBuf>,

    /// Directory the executable writes rendered images to.
    /// Defaults to `<input_dir>/output`.
    pub output_dir: Option<PathBuf>,

    /// Extra executable locations, checked before the built-in candidates.
    pub extra_candidates: Vec<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "posekit_batch=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            input_dir: None,
            output_dir: None,
            worker: vec![
                "python3".to_string(),
                "scripts/mediapipe_worker.py".to_string(),
            ],
            estimator: EstimatorSettings::default(),
        }
    }
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            static_image_mode: true,
            model_complexity: 2,
            enable_segmentation: true,
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to an explicit path, creating parent directories.
    pub fn save_to(&self, config_path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

impl ProcessorConfig {
    /// Output directory, defaulting to `output2` inside the input directory.
    pub fn resolved_output_dir(&self, input_dir: &Path) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| input_dir.join("output2"))
    }
}

impl InvokerConfig {
    /// Output directory, defaulting to `output` inside the input directory.
    pub fn resolved_output_dir(&self, input_dir: &Path) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| input_dir.join("output"))
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("posekit").join("config.json")
}
