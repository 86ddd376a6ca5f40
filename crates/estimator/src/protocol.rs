//! JSON line protocol spoken with the MediaPipe worker process.
//!
//! ```text
//! worker → {"ready": true, "model": "mediapipe pose (complexity 2)"}
//! bridge → {"image": "/abs/path/frame_0001.png"}
//! worker → {"landmarks": [{"x":0.5,"y":0.4,"z":-0.1,"visibility":0.99}, ...],
//!           "segmentation_mask": {"width":512,"height":512,"data":[...]}}
//! worker → {"landmarks": null, "segmentation_mask": null}
//! worker → {"error": "could not read image"}
//! ```
//!
//! Model settings travel as environment variables set at spawn time.

use serde::{Deserialize, Serialize};

use posekit_common::config::EstimatorSettings;
use posekit_pose_model::{Landmark, PoseDetection, SegmentationMask};

use crate::bridge::EstimatorError;

/// First line the worker prints once its model is loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadyMessage {
    pub ready: bool,
    #[serde(default)]
    pub model: Option<String>,
}

/// One inference request.
#[derive(Debug, Clone, Serialize)]
pub struct ImageRequest<'a> {
    pub image: &'a str,
}

/// Landmark as sent by the worker; the index is implied by position.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WireLandmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    #[serde(default)]
    pub visibility: f32,
}

/// One inference response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageResponse {
    #[serde(default)]
    pub landmarks: Option<Vec<WireLandmark>>,
    #[serde(default)]
    pub segmentation_mask: Option<SegmentationMask>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ImageResponse {
    /// Convert to a detection. `Ok(None)` when no pose was found.
    pub fn into_detection(self, path: &str) -> Result<Option<PoseDetection>, EstimatorError> {
        if let Some(message) = self.error {
            return Err(EstimatorError::Inference {
                path: path.to_string(),
                message,
            });
        }

        let landmarks = match self.landmarks {
            Some(landmarks) if !landmarks.is_empty() => landmarks,
            _ => return Ok(None),
        };

        if let Some(mask) = &self.segmentation_mask {
            mask.validate().map_err(|e| EstimatorError::Protocol {
                message: e.to_string(),
            })?;
        }

        let landmarks = landmarks
            .into_iter()
            .enumerate()
            .map(|(i, wire)| Landmark {
                index: i as u32,
                x: wire.x,
                y: wire.y,
                z: wire.z,
                visibility: wire.visibility,
            })
            .collect();

        Ok(Some(PoseDetection {
            landmarks,
            segmentation: self.segmentation_mask,
        }))
    }
}

/// Environment variables carrying the model settings to the worker.
pub fn settings_env(settings: &EstimatorSettings) -> Vec<(&'static str, String)> {
    let flag = |b: bool| (if b { "1" } else { "0" }).to_string();
    vec![
        (
            "POSEKIT_STATIC_IMAGE_MODE",
            flag(settings.static_image_mode),
        ),
        (
            "POSEKIT_MODEL_COMPLEXITY",
            settings.model_complexity.to_string(),
        ),
        (
            "POSEKIT_ENABLE_SEGMENTATION",
            flag(settings.enable_segmentation),
        ),
        (
            "POSEKIT_MIN_DETECTION_CONFIDENCE",
            settings.min_detection_confidence.to_string(),
        ),
        (
            "POSEKIT_MIN_TRACKING_CONFIDENCE",
            settings.min_tracking_confidence.to_string(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ImageResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_null_landmarks_is_no_pose() {
        let response = parse(r#"{"landmarks": null, "segmentation_mask": null}"#);
        assert!(response.into_detection("a.png").unwrap().is_none());
    }

    #[test]
    fn test_empty_landmarks_is_no_pose() {
        let response = parse(r#"{"landmarks": []}"#);
        assert!(response.into_detection("a.png").unwrap().is_none());
    }

    #[test]
    fn test_landmarks_get_sequential_indices() {
        let response = parse(
            r#"{"landmarks": [
                {"x": 0.1, "y": 0.2, "z": 0.3, "visibility": 0.9},
                {"x": 0.4, "y": 0.5, "z": 0.6}
            ]}"#,
        );
        let detection = response.into_detection("a.png").unwrap().unwrap();
        assert_eq!(detection.landmarks.len(), 2);
        assert_eq!(detection.landmarks[1].index, 1);
        assert_eq!(detection.landmarks[1].visibility, 0.0);
        assert!(detection.segmentation.is_none());
    }

    #[test]
    fn test_worker_error_surfaces_path() {
        let err = parse(r#"{"error": "boom"}"#)
            .into_detection("frames/a.png")
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("frames/a.png"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn test_misshapen_mask_is_protocol_error() {
        let response = parse(
            r#"{"landmarks": [{"x": 0.1, "y": 0.2, "z": 0.3, "visibility": 0.9}],
                "segmentation_mask": {"width": 2, "height": 2, "data": [0.0]}}"#,
        );
        assert!(matches!(
            response.into_detection("a.png"),
            Err(EstimatorError::Protocol { .. })
        ));
    }

    #[test]
    fn test_settings_env() {
        let env = settings_env(&EstimatorSettings::default());
        assert!(env.contains(&("POSEKIT_MODEL_COMPLEXITY", "2".to_string())));
        assert!(env.contains(&("POSEKIT_ENABLE_SEGMENTATION", "1".to_string())));
        assert!(env.contains(&("POSEKIT_MIN_DETECTION_CONFIDENCE", "0.5".to_string())));
    }
}
