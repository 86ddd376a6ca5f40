//! Skeleton topology of the 33-point MediaPipe body pose model.

/// Number of landmarks the body pose model emits.
pub const POSE_LANDMARK_COUNT: usize = 33;

/// Landmark pairs joined by a bone when drawing the skeleton.
pub const POSE_CONNECTIONS: [(u32, u32); 35] = [
    // Face
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 7),
    (0, 4),
    (4, 5),
    (5, 6),
    (6, 8),
    (9, 10),
    // Shoulders and arms
    (11, 12),
    (11, 13),
    (13, 15),
    (15, 17),
    (15, 19),
    (15, 21),
    (17, 19),
    (12, 14),
    (14, 16),
    (16, 18),
    (16, 20),
    (16, 22),
    (18, 20),
    // Torso
    (11, 23),
    (12, 24),
    (23, 24),
    // Legs
    (23, 25),
    (24, 26),
    (25, 27),
    (26, 28),
    (27, 29),
    (28, 30),
    (29, 31),
    (30, 32),
    (27, 31),
    (28, 32),
];

/// Human-readable name of a body landmark index.
pub fn landmark_name(index: u32) -> Option<&'static str> {
    const NAMES: [&str; POSE_LANDMARK_COUNT] = [
        "nose",
        "left_eye_inner",
        "left_eye",
        "left_eye_outer",
        "right_eye_inner",
        "right_eye",
        "right_eye_outer",
        "left_ear",
        "right_ear",
        "mouth_left",
        "mouth_right",
        "left_shoulder",
        "right_shoulder",
        "left_elbow",
        "right_elbow",
        "left_wrist",
        "right_wrist",
        "left_pinky",
        "right_pinky",
        "left_index",
        "right_index",
        "left_thumb",
        "right_thumb",
        "left_hip",
        "right_hip",
        "left_knee",
        "right_knee",
        "left_ankle",
        "right_ankle",
        "left_heel",
        "right_heel",
        "left_foot_index",
        "right_foot_index",
    ];
    NAMES.get(index as usize).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connections_reference_valid_landmarks() {
        for (a, b) in POSE_CONNECTIONS {
            assert!((a as usize) < POSE_LANDMARK_COUNT);
            assert!((b as usize) < POSE_LANDMARK_COUNT);
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_landmark_names() {
        assert_eq!(landmark_name(0), Some("nose"));
        assert_eq!(landmark_name(32), Some("right_foot_index"));
        assert_eq!(landmark_name(33), None);
    }
}
