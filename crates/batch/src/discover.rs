//! Input image discovery.

use std::path::{Path, PathBuf};

use posekit_common::error::{PosekitError, PosekitResult};

/// Extensions picked up from the input directory. Matching is literal and
/// case-sensitive: `photo.JPG` is ignored.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Whether `path` carries one of the recognized image extensions.
pub fn is_recognized_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext))
}

/// List recognized image files directly inside `dir`, sorted by path.
///
/// Subdirectories are not descended into. A missing directory yields
/// [`PosekitError::DirectoryNotFound`].
pub fn discover_images(dir: &Path) -> PosekitResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PosekitError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut images = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && is_recognized_image(&path) {
            images.push(path);
        }
    }
    images.sort();

    tracing::debug!(dir = %dir.display(), count = images.len(), "Discovered images");
    Ok(images)
}
