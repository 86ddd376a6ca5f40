//! OpenPose executable discovery.

use std::path::PathBuf;

/// Built-in install locations, checked in order.
pub const DEFAULT_CANDIDATES: [&str; 3] = [
    // Source build, run from the OpenPose checkout
    "./build/examples/openpose/openpose.bin",
    // System install
    "/usr/local/bin/openpose.bin",
    // Windows portable release
    "C:/Program Files/OpenPose/bin/OpenPoseDemo.exe",
];

/// Configured extra locations first, then the built-in ones.
pub fn candidate_paths(extra: &[PathBuf]) -> Vec<PathBuf> {
    extra
        .iter()
        .cloned()
        .chain(DEFAULT_CANDIDATES.iter().map(PathBuf::from))
        .collect()
}

/// First candidate that exists on disk.
pub fn locate_executable(candidates: &[PathBuf]) -> Option<PathBuf> {
    let found = candidates.iter().find(|path| path.exists()).cloned();
    match &found {
        Some(path) => tracing::debug!(path = %path.display(), "Found OpenPose executable"),
        None => tracing::debug!(checked = candidates.len(), "No OpenPose executable found"),
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extra_candidates_come_first() {
        let paths = candidate_paths(&[PathBuf::from("/opt/openpose/bin/openpose.bin")]);
        assert_eq!(paths.len(), DEFAULT_CANDIDATES.len() + 1);
        assert_eq!(paths[0], PathBuf::from("/opt/openpose/bin/openpose.bin"));
        assert_eq!(paths[1], PathBuf::from(DEFAULT_CANDIDATES[0]));
    }

    #[test]
    fn test_locate_picks_first_existing() {
        let dir = std::env::temp_dir().join("posekit_test_locate");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let second = dir.join("second.bin");
        let third = dir.join("third.bin");
        std::fs::write(&second, b"").unwrap();
        std::fs::write(&third, b"").unwrap();

        let found = locate_executable(&[dir.join("first.bin"), second.clone(), third]);
        assert_eq!(found, Some(second));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_locate_none_when_nothing_exists() {
        let missing = std::env::temp_dir().join("posekit_test_locate_missing.bin");
        let _ = std::fs::remove_file(&missing);
        assert_eq!(locate_executable(&[missing]), None);
    }
}
