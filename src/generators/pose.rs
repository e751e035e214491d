//! 22-joint skeletal poses and the text format used to override them.

use serde::{Deserialize, Serialize};

/// Number of joints in a pose.
pub const JOINT_COUNT: usize = 22;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Joint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Joint {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// T-pose used for every joint an override leaves out.
const T_POSE: [Joint; JOINT_COUNT] = [
    Joint::new(0.0, 0.0, 0.0),     // 0 pelvis
    Joint::new(0.15, 0.0, 0.0),    // 1 right hip
    Joint::new(-0.15, 0.0, 0.0),   // 2 left hip
    Joint::new(0.0, 0.2, 0.0),     // 3 lower spine
    Joint::new(0.15, -0.4, 0.0),   // 4 right knee
    Joint::new(-0.15, -0.4, 0.0),  // 5 left knee
    Joint::new(0.0, 0.4, 0.0),     // 6 upper spine
    Joint::new(0.15, -0.8, 0.0),   // 7 right ankle
    Joint::new(-0.15, -0.8, 0.0),  // 8 left ankle
    Joint::new(0.0, 0.6, 0.0),     // 9 chest
    Joint::new(0.15, -0.9, 0.1),   // 10 right foot
    Joint::new(-0.15, -0.9, 0.1),  // 11 left foot
    Joint::new(0.0, 0.7, 0.0),     // 12 neck
    Joint::new(0.3, 0.6, 0.0),     // 13 right shoulder
    Joint::new(-0.3, 0.6, 0.0),    // 14 left shoulder
    Joint::new(0.0, 0.85, 0.0),    // 15 head
    Joint::new(0.5, 0.6, 0.0),     // 16 right elbow
    Joint::new(-0.5, 0.6, 0.0),    // 17 left elbow
    Joint::new(0.7, 0.6, 0.0),     // 18 right wrist
    Joint::new(-0.7, 0.6, 0.0),    // 19 left wrist
    Joint::new(0.8, 0.6, 0.0),     // 20 right hand
    Joint::new(-0.8, 0.6, 0.0),    // 21 left hand
];

pub fn default_pose() -> [Joint; JOINT_COUNT] {
    T_POSE
}

/// Parses `index,x,y,z` lines over the default pose.
///
/// Lines with fewer than four fields, non-numeric or non-finite values, a fractional
/// index or an index outside the pose are skipped.
pub fn parse_pose(text: &str) -> [Joint; JOINT_COUNT] {
    let mut joints = T_POSE;

    for line in text.trim().lines() {
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() < 4 {
            continue;
        }

        let parsed = (
            parts[0].parse::<f64>(),
            parts[1].parse::<f64>(),
            parts[2].parse::<f64>(),
            parts[3].parse::<f64>(),
        );
        let (index, x, y, z) = match parsed {
            (Ok(i), Ok(x), Ok(y), Ok(z)) => (i, x, y, z),
            _ => continue,
        };
        // "NaN" and "inf" parse as f64 but are not coordinates
        if ![index, x, y, z].iter().all(|v| v.is_finite()) {
            continue;
        }

        if index.fract() != 0.0 || index < 0.0 || index >= JOINT_COUNT as f64 {
            continue;
        }
        joints[index as usize] = Joint::new(x, y, z);
    }

    joints
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_gives_default_pose() {
        assert_eq!(parse_pose(""), default_pose());
        assert_eq!(parse_pose("   \n  "), default_pose());
    }

    #[test]
    fn test_partial_override() {
        let joints = parse_pose("0, 1.0, 2.0, 3.0\n15,0.1,1.2,-0.3");
        assert_eq!(joints[0], Joint::new(1.0, 2.0, 3.0));
        assert_eq!(joints[15], Joint::new(0.1, 1.2, -0.3));
        assert_eq!(joints[9], default_pose()[9]);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = "index,x,y,z\n3,1,2\n4,a,0,0\n22,1,1,1\n-1,1,1,1\n2.5,1,1,1\n5,9,9,9,extra";
        let joints = parse_pose(text);
        let defaults = default_pose();

        assert_eq!(joints[3], defaults[3]);
        assert_eq!(joints[4], defaults[4]);
        assert_eq!(joints[2], defaults[2]);
        assert_eq!(joints[5], Joint::new(9.0, 9.0, 9.0));
    }

    #[test]
    fn test_non_finite_values_are_skipped() {
        let text = "3,NaN,0,0\n4,inf,0,0\n6,0,-infinity,0\n7,0,0,nan\nNaN,1,1,1";
        assert_eq!(parse_pose(text), default_pose());
    }

    #[test]
    fn test_windows_line_endings() {
        let joints = parse_pose("1,0.5,0.5,0.5\r\n2,0.25,0.25,0.25\r\n");
        assert_eq!(joints[1], Joint::new(0.5, 0.5, 0.5));
        assert_eq!(joints[2], Joint::new(0.25, 0.25, 0.25));
    }
}
