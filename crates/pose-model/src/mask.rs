//! Segmentation mask produced alongside pose landmarks.

use serde::{Deserialize, Serialize};

/// Per-pixel foreground probability map, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationMask {
    pub width: u32,
    pub height: u32,
    pub data: Vec<f32>,
}

/// Error returned when mask data does not match its declared size.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("mask is {width}x{height} but holds {len} values")]
pub struct MaskShapeError {
    pub width: u32,
    pub height: u32,
    pub len: usize,
}

impl SegmentationMask {
    pub fn new(width: u32, height: u32, data: Vec<f32>) -> Result<Self, MaskShapeError> {
        let mask = Self {
            width,
            height,
            data,
        };
        mask.validate()?;
        Ok(mask)
    }

    /// Check that `data` holds exactly `width * height` values.
    pub fn validate(&self) -> Result<(), MaskShapeError> {
        if self.data.len() != self.width as usize * self.height as usize {
            return Err(MaskShapeError {
                width: self.width,
                height: self.height,
                len: self.data.len(),
            });
        }
        Ok(())
    }

    /// Probability at a pixel, 0.0 outside the mask.
    pub fn probability(&self, x: u32, y: u32) -> f32 {
        if x >= self.width || y >= self.height {
            return 0.0;
        }
        self.data
            .get(y as usize * self.width as usize + x as usize)
            .copied()
            .unwrap_or(0.0)
    }

    /// Grayscale byte at a pixel: probability scaled to 255 and truncated.
    pub fn gray_at(&self, x: u32, y: u32) -> u8 {
        let scaled = self.probability(x, y) * 255.0;
        if scaled.is_nan() {
            return 0;
        }
        scaled.clamp(0.0, 255.0) as u8
    }
}
