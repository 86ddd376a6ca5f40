//! Output naming and all-or-nothing artifact writes.
//!
//! Each source image yields `pose_<file name>` and, when a pose was found,
//! `landmarks_<stem>.txt`. Both files are staged under hidden temporary
//! names and renamed into place only after every write has succeeded.

use std::ffi::OsString;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};

use posekit_common::error::{PosekitError, PosekitResult};

/// Final locations of the artifacts produced for one source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Rendered (or copied) image.
    pub image: PathBuf,

    /// Landmark dump, written only when a pose was detected.
    pub landmarks: PathBuf,
}

impl ArtifactPaths {
    /// Derive artifact paths for `source` inside `output_dir`.
    pub fn for_source(source: &Path, output_dir: &Path) -> PosekitResult<Self> {
        let file_name = source.file_name().ok_or_else(|| {
            PosekitError::render(format!("{} has no file name", source.display()))
        })?;
        let stem = source.file_stem().unwrap_or(file_name);

        let mut image_name = OsString::from("pose_");
        image_name.push(file_name);

        let mut landmarks_name = OsString::from("landmarks_");
        landmarks_name.push(stem);
        landmarks_name.push(".txt");

        Ok(Self {
            image: output_dir.join(image_name),
            landmarks: output_dir.join(landmarks_name),
        })
    }
}

/// Fully encoded artifacts for one image, ready to be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingArtifacts {
    /// Encoded bytes of the output image.
    pub image: Vec<u8>,

    /// Landmark dump text, if a pose was detected.
    pub landmarks: Option<String>,
}

impl PendingArtifacts {
    /// Copy the source bytes verbatim (no pose found).
    pub fn copy_of(source: &Path) -> PosekitResult<Self> {
        Ok(Self {
            image: std::fs::read(source)?,
            landmarks: None,
        })
    }

    /// Encode a rendered image in the format implied by `target`'s extension.
    pub fn rendered(image: &RgbImage, target: &Path, landmarks: String) -> PosekitResult<Self> {
        let format = ImageFormat::from_path(target)
            .map_err(|e| PosekitError::render(format!("{}: {e}", target.display())))?;
        let mut bytes = Cursor::new(Vec::new());
        image
            .write_to(&mut bytes, format)
            .map_err(|e| PosekitError::render(format!("Failed to encode {}: {e}", target.display())))?;
        Ok(Self {
            image: bytes.into_inner(),
            landmarks: Some(landmarks),
        })
    }

    /// Write both artifacts. On failure nothing from this call is left on disk.
    pub fn commit(&self, paths: &ArtifactPaths) -> PosekitResult<()> {
        let staged_image = staging_path(&paths.image);
        let staged_landmarks = staging_path(&paths.landmarks);

        let result = self.stage_and_rename(paths, &staged_image, &staged_landmarks);
        if result.is_err() {
            let _ = std::fs::remove_file(&staged_image);
            let _ = std::fs::remove_file(&staged_landmarks);
        }
        result
    }

    fn stage_and_rename(
        &self,
        paths: &ArtifactPaths,
        staged_image: &Path,
        staged_landmarks: &Path,
    ) -> PosekitResult<()> {
        std::fs::write(staged_image, &self.image)?;
        match &self.landmarks {
            Some(text) => std::fs::write(staged_landmarks, text)?,
            None => {
                // A dump left by an earlier run would claim a detection.
                if paths.landmarks.exists() {
                    tracing::debug!(path = %paths.landmarks.display(), "Removing stale landmark dump");
                    std::fs::remove_file(&paths.landmarks)?;
                }
            }
        }

        std::fs::rename(staged_image, &paths.image)?;
        if self.landmarks.is_some() {
            if let Err(e) = std::fs::rename(staged_landmarks, &paths.landmarks) {
                let _ = std::fs::remove_file(&paths.image);
                return Err(e.into());
            }
        }
        Ok(())
    }
}

fn staging_path(target: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    if let Some(file_name) = target.file_name() {
        name.push(file_name);
    }
    name.push(".partial");
    target.with_file_name(name)
}
