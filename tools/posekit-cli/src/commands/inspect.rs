//! Show a landmark dump written by `posekit process`.

use std::path::PathBuf;

use posekit_pose_model::{landmark_name, parse_landmarks};

/// Landmarks below this visibility are flagged in the listing.
const LOW_VISIBILITY: f32 = 0.5;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    let set = parse_landmarks(&text)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {e}", path.display()))?;

    println!("Landmarks: {}", path.display());
    println!(
        "  Image size: {}x{}",
        set.image_size.width, set.image_size.height
    );
    println!("  Points: {}", set.len());
    println!();

    for lm in &set.landmarks {
        let name = landmark_name(lm.index).unwrap_or("unknown");
        let (px, py) = match lm.to_pixel(set.image_size.width, set.image_size.height) {
            Some((x, y)) => (x.to_string(), y.to_string()),
            None => ("-".to_string(), "-".to_string()),
        };
        let flag = if lm.visibility < LOW_VISIBILITY {
            "  (low visibility)"
        } else {
            ""
        };
        println!(
            "  {:>2} {:<18} px=({px}, {py}) z={:.4} vis={:.2}{flag}",
            lm.index, name, lm.z, lm.visibility
        );
    }

    Ok(())
}
