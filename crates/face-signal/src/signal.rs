//! Per-tick face signal

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Face signal derived each tick and threaded into the next one.
///
/// `focus_lost_start` and `no_face_start` are streak anchors: they hold the
/// instant the current streak began and never advance while it lasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceSignal {
    /// Number of faces in frame
    pub face_count: u32,

    /// Exactly one face, facing the screen
    pub is_focused: bool,

    /// Eyes closed past the drowsiness threshold
    pub is_drowsy: bool,

    /// Start of the current un-focused streak
    pub focus_lost_start: Option<DateTime<Utc>>,

    /// Start of the current zero-face streak
    pub no_face_start: Option<DateTime<Utc>>,

    /// When the eye aspect ratio first dropped below threshold
    #[serde(skip)]
    pub eyes_closed_since: Option<DateTime<Utc>>,
}

impl Default for FaceSignal {
    fn default() -> Self {
        Self {
            face_count: 0,
            is_focused: true,
            is_drowsy: false,
            focus_lost_start: None,
            no_face_start: None,
            eyes_closed_since: None,
        }
    }
}

impl FaceSignal {
    /// Age of the current un-focused streak (milliseconds)
    pub fn focus_lost_ms(&self, now: DateTime<Utc>) -> Option<i64> {
        self.focus_lost_start.map(|start| (now - start).num_milliseconds())
    }

    /// Age of the current zero-face streak (milliseconds)
    pub fn no_face_ms(&self, now: DateTime<Utc>) -> Option<i64> {
        self.no_face_start.map(|start| (now - start).num_milliseconds())
    }

    /// Reset to the initial signal
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
