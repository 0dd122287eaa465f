//! Signal interpreter configuration

use serde::{Deserialize, Serialize};

/// Signal interpreter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceSignalConfig {
    /// Maximum nose offset from the eye-corner midpoint, as a fraction of
    /// the eye-corner distance, for a frontal pose
    pub horizontal_ratio_threshold: f32,

    /// Eye aspect ratio below which the eyes count as closed
    pub ear_threshold: f32,

    /// Eyes-closed time before the candidate counts as drowsy (milliseconds)
    pub drowsiness_threshold_ms: i64,
}

impl Default for FaceSignalConfig {
    fn default() -> Self {
        Self {
            horizontal_ratio_threshold: 0.15,
            ear_threshold: 0.22,
            drowsiness_threshold_ms: 2000,
        }
    }
}

impl FaceSignalConfig {
    /// Create strict config (tighter pose window, quicker drowsiness)
    pub fn strict() -> Self {
        Self {
            horizontal_ratio_threshold: 0.12,
            drowsiness_threshold_ms: 1500,
            ..Default::default()
        }
    }

    /// Create lenient config (wider pose window, slower drowsiness)
    pub fn lenient() -> Self {
        Self {
            horizontal_ratio_threshold: 0.2,
            drowsiness_threshold_ms: 3000,
            ..Default::default()
        }
    }
}
