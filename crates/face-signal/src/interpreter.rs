//! Landmark-to-signal interpretation

use chrono::{DateTime, Utc};
use perception::FaceLandmarks;
use tracing::{debug, info};

use crate::geometry::{average_ear, horizontal_offset_ratio};
use crate::{FaceSignal, FaceSignalConfig, SignalError};

/// Focus and eye-closure readings for a single face
#[derive(Debug, Clone, Copy, PartialEq)]
struct FaceReading {
    focused: bool,
    ear: f32,
}

/// Converts face-mesh results into [`FaceSignal`]s.
///
/// Interpretation is a pure function of the previous signal, the current
/// landmarks and the tick time; all temporal state rides on the signal.
#[derive(Debug, Clone, Default)]
pub struct SignalInterpreter {
    config: FaceSignalConfig,
}

impl SignalInterpreter {
    pub fn new(config: FaceSignalConfig) -> Self {
        info!(
            "Creating signal interpreter: pose ratio < {}, EAR < {} for {}ms",
            config.horizontal_ratio_threshold, config.ear_threshold, config.drowsiness_threshold_ms
        );
        Self { config }
    }

    pub fn config(&self) -> &FaceSignalConfig {
        &self.config
    }

    /// Interpret one tick's faces given the previous tick's signal
    pub fn interpret(&self, previous: &FaceSignal, faces: &[FaceLandmarks], now: DateTime<Utc>) -> FaceSignal {
        let face_count = faces.len() as u32;

        let (is_focused, is_drowsy, eyes_closed_since) = match faces {
            [face] => match self.read_face(face) {
                Ok(reading) => {
                    let (drowsy, since) = self.track_eyes(reading.ear, previous.eyes_closed_since, now);
                    (reading.focused, drowsy, since)
                }
                Err(e) => {
                    debug!("Treating degenerate face mesh as unfocused: {}", e);
                    (false, false, None)
                }
            },
            // Zero or several faces: never focused, eyes not evaluated
            _ => (false, false, None),
        };

        let no_face_start = if face_count > 0 {
            None
        } else {
            previous.no_face_start.or(Some(now))
        };

        let focus_lost_start = if is_focused {
            None
        } else {
            previous.focus_lost_start.or(Some(now))
        };

        FaceSignal {
            face_count,
            is_focused,
            is_drowsy,
            focus_lost_start,
            no_face_start,
            eyes_closed_since,
        }
    }

    fn read_face(&self, face: &FaceLandmarks) -> Result<FaceReading, SignalError> {
        let ratio = horizontal_offset_ratio(face)?;
        let ear = average_ear(face)?;
        Ok(FaceReading {
            focused: ratio < self.config.horizontal_ratio_threshold,
            ear,
        })
    }

    /// Drowsiness accumulator: returns (drowsy, eyes-closed anchor)
    fn track_eyes(
        &self,
        ear: f32,
        closed_since: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> (bool, Option<DateTime<Utc>>) {
        if ear >= self.config.ear_threshold {
            return (false, None);
        }

        match closed_since {
            None => (false, Some(now)),
            Some(since) => {
                let closed_ms = (now - since).num_milliseconds();
                (closed_ms > self.config.drowsiness_threshold_ms, Some(since))
            }
        }
    }
}
