//! Event deriver configuration

use serde::{Deserialize, Serialize};

/// Event deriver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeriverConfig {
    /// Un-focused streak age before `focus_lost` fires (milliseconds)
    pub focus_lost_sustain_ms: i64,

    /// Zero-face streak age before `no_face` fires (milliseconds)
    pub no_face_sustain_ms: i64,

    /// Minimum spacing between two events of the same type (milliseconds)
    pub cooldown_ms: i64,

    /// Object detections at or below this confidence are ignored
    pub object_confidence_threshold: f32,
}

impl Default for DeriverConfig {
    fn default() -> Self {
        Self {
            focus_lost_sustain_ms: 5_000,
            no_face_sustain_ms: 10_000,
            cooldown_ms: 20_000,
            object_confidence_threshold: 0.7,
        }
    }
}

impl DeriverConfig {
    /// Create strict config (shorter sustain gates)
    pub fn strict() -> Self {
        Self {
            focus_lost_sustain_ms: 3_000,
            no_face_sustain_ms: 5_000,
            ..Default::default()
        }
    }

    /// Create lenient config (longer sustain gates, sparser events)
    pub fn lenient() -> Self {
        Self {
            focus_lost_sustain_ms: 8_000,
            no_face_sustain_ms: 15_000,
            cooldown_ms: 30_000,
            object_confidence_threshold: 0.8,
        }
    }
}
