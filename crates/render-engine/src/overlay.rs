//! Keypoint, skeleton and segmentation overlay.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_line_segment_mut};

use posekit_common::error::{PosekitError, PosekitResult};
use posekit_pose_model::{Landmark, PoseDetection, SegmentationMask, POSE_CONNECTIONS};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Colour and stroke for one kind of overlay element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawingSpec {
    pub color: Rgb<u8>,
    /// Stroke width of lines and marker rings.
    pub thickness: u32,
    /// Marker ring radius. Not used for connection lines.
    pub circle_radius: u32,
}

/// Fixed visual parameters for a rendered pose.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    /// Keypoint markers.
    pub landmark: DrawingSpec,

    /// Skeleton connection lines.
    pub connection: DrawingSpec,

    /// Landmarks less visible than this are not drawn.
    pub visibility_threshold: f32,

    /// Weight of the grayscale mask in the final blend.
    pub mask_opacity: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            landmark: DrawingSpec {
                color: Rgb([0, 255, 0]),
                thickness: 2,
                circle_radius: 2,
            },
            connection: DrawingSpec {
                color: Rgb([0, 0, 255]),
                thickness: 2,
                circle_radius: 2,
            },
            visibility_threshold: 0.5,
            mask_opacity: 0.1,
        }
    }
}

/// Render a detection onto a copy of `image`.
///
/// Skeleton and keypoints are drawn first; the segmentation mask, when
/// present, is blended over the result.
pub fn render_detection(
    image: &RgbImage,
    detection: &PoseDetection,
    style: &OverlayStyle,
) -> PosekitResult<RgbImage> {
    tracing::trace!(
        landmarks = detection.landmarks.len(),
        mask = detection.segmentation.is_some(),
        "Rendering pose overlay"
    );
    let mut output = image.clone();
    draw_landmarks(&mut output, &detection.landmarks, &POSE_CONNECTIONS, style);
    if let Some(mask) = &detection.segmentation {
        blend_mask(&mut output, mask, style.mask_opacity)?;
    }
    Ok(output)
}

/// Draw connection lines then keypoint markers for every drawable landmark.
///
/// A landmark is drawable when it lies inside the frame and its visibility
/// reaches the style threshold. Connections need both ends drawable.
pub fn draw_landmarks(
    image: &mut RgbImage,
    landmarks: &[Landmark],
    connections: &[(u32, u32)],
    style: &OverlayStyle,
) {
    let (width, height) = image.dimensions();
    let pixel_of = |index: u32| -> Option<(u32, u32)> {
        let lm = landmarks.iter().find(|lm| lm.index == index)?;
        if lm.visibility < style.visibility_threshold {
            return None;
        }
        lm.to_pixel(width, height)
    };

    for &(start, end) in connections {
        if let (Some(a), Some(b)) = (pixel_of(start), pixel_of(end)) {
            draw_thick_line(image, a, b, &style.connection);
        }
    }

    let spec = &style.landmark;
    let border = DrawingSpec {
        color: WHITE,
        circle_radius: (spec.circle_radius + 1).max((spec.circle_radius as f32 * 1.2) as u32),
        ..*spec
    };
    for lm in landmarks {
        if let Some((x, y)) = pixel_of(lm.index) {
            let center = (x as i32, y as i32);
            draw_ring(image, center, &border);
            draw_ring(image, center, spec);
        }
    }
}

/// Circle outline `thickness` pixels wide, centred on `circle_radius`.
fn draw_ring(image: &mut RgbImage, center: (i32, i32), spec: &DrawingSpec) {
    let radius = spec.circle_radius as i32;
    let thickness = spec.thickness.max(1) as i32;
    for r in (radius - (thickness - 1) / 2)..=(radius + thickness / 2) {
        if r > 0 {
            draw_hollow_circle_mut(image, center, r, spec.color);
        }
    }
}

/// Blend a grayscale rendition of `mask` over `image`:
/// `out = round((1 - opacity) * pixel + opacity * gray)`, saturated.
pub fn blend_mask(image: &mut RgbImage, mask: &SegmentationMask, opacity: f64) -> PosekitResult<()> {
    if mask.width != image.width() || mask.height != image.height() {
        return Err(PosekitError::render(format!(
            "segmentation mask is {}x{} but image is {}x{}",
            mask.width,
            mask.height,
            image.width(),
            image.height()
        )));
    }
    mask.validate()
        .map_err(|e| PosekitError::render(e.to_string()))?;

    let keep = 1.0 - opacity;
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let gray = mask.gray_at(x, y) as f64;
        for channel in pixel.0.iter_mut() {
            let blended = keep * *channel as f64 + opacity * gray;
            *channel = blended.round().clamp(0.0, 255.0) as u8;
        }
    }
    Ok(())
}

fn draw_thick_line(image: &mut RgbImage, a: (u32, u32), b: (u32, u32), spec: &DrawingSpec) {
    let thickness = spec.thickness.max(1) as i32;
    let lo = -((thickness - 1) / 2);
    let hi = thickness / 2;
    for dx in lo..=hi {
        for dy in lo..=hi {
            draw_line_segment_mut(
                image,
                ((a.0 as i32 + dx) as f32, (a.1 as i32 + dy) as f32),
                ((b.0 as i32 + dx) as f32, (b.1 as i32 + dy) as f32),
                spec.color,
            );
        }
    }
}
