//! Landmark types produced by a pose estimator.
//!
//! Landmark `x`/`y` are normalized to `[0.0, 1.0]` relative to the source
//! image width and height. `z` is depth relative to the hip midpoint on
//! roughly the same scale as `x`; smaller is closer to the camera.

use serde::{Deserialize, Serialize};

use crate::mask::SegmentationMask;

/// A single detected body keypoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Position in the estimator's landmark ordering.
    pub index: u32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Likelihood [0.0, 1.0] that the point is visible in the image.
    pub visibility: f32,
}

impl Landmark {
    /// Whether the normalized position lies inside the image.
    pub fn is_in_frame(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }

    /// Pixel coordinate for an image of the given size, or `None` when the
    /// landmark lies outside the frame.
    pub fn to_pixel(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        if !self.is_in_frame() || width == 0 || height == 0 {
            return None;
        }
        let px = ((self.x * width as f32).floor() as u32).min(width - 1);
        let py = ((self.y * height as f32).floor() as u32).min(height - 1);
        Some((px, py))
    }
}

/// Pixel dimensions of the image a landmark set was detected on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// All landmarks detected on one image, with the image's size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSet {
    pub image_size: ImageSize,
    pub landmarks: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn new(width: u32, height: u32, landmarks: Vec<Landmark>) -> Self {
        Self {
            image_size: ImageSize { width, height },
            landmarks,
        }
    }

    /// Number of landmarks in the set.
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Look up a landmark by its index.
    pub fn get(&self, index: u32) -> Option<&Landmark> {
        self.landmarks.iter().find(|lm| lm.index == index)
    }
}

/// Result of a single-image inference call that found a pose.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseDetection {
    /// Landmarks in estimator order, indices assigned from 0.
    pub landmarks: Vec<Landmark>,

    /// Per-pixel foreground probability, when segmentation was enabled.
    pub segmentation: Option<SegmentationMask>,
}

impl PoseDetection {
    /// Attach the source image size to produce a serializable landmark set.
    pub fn landmark_set(&self, width: u32, height: u32) -> LandmarkSet {
        LandmarkSet::new(width, height, self.landmarks.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lm(x: f32, y: f32) -> Landmark {
        Landmark {
            index: 0,
            x,
            y,
            z: 0.0,
            visibility: 1.0,
        }
    }

    #[test]
    fn test_to_pixel_floors_and_clamps() {
        assert_eq!(lm(0.5, 0.25).to_pixel(640, 480), Some((320, 120)));
        assert_eq!(lm(1.0, 1.0).to_pixel(640, 480), Some((639, 479)));
        assert_eq!(lm(0.0, 0.0).to_pixel(640, 480), Some((0, 0)));
    }

    #[test]
    fn test_out_of_frame_has_no_pixel() {
        assert_eq!(lm(-0.01, 0.5).to_pixel(100, 100), None);
        assert_eq!(lm(0.5, 1.2).to_pixel(100, 100), None);
        assert_eq!(lm(f32::NAN, 0.5).to_pixel(100, 100), None);
    }

    #[test]
    fn test_landmark_set_lookup() {
        let mut second = lm(0.1, 0.2);
        second.index = 1;
        let set = LandmarkSet::new(10, 20, vec![lm(0.0, 0.0), second]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(1).map(|l| l.x), Some(0.1));
        assert!(set.get(7).is_none());
    }
}
