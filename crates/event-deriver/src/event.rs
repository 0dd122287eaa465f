//! Detection events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Violation event types
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    FocusLost,
    NoFace,
    MultipleFaces,
    PhoneDetected,
    BookDetected,
    DeviceDetected,
    DrowsinessDetected,
    AudioDetected,
    /// Type string not known to this build (e.g. from an older stored session)
    Other(String),
}

impl EventType {
    /// Every type this build emits
    pub const ALL: [EventType; 8] = [
        EventType::FocusLost,
        EventType::NoFace,
        EventType::MultipleFaces,
        EventType::PhoneDetected,
        EventType::BookDetected,
        EventType::DeviceDetected,
        EventType::DrowsinessDetected,
        EventType::AudioDetected,
    ];

    /// Wire name
    pub fn as_str(&self) -> &str {
        match self {
            EventType::FocusLost => "focus_lost",
            EventType::NoFace => "no_face",
            EventType::MultipleFaces => "multiple_faces",
            EventType::PhoneDetected => "phone_detected",
            EventType::BookDetected => "book_detected",
            EventType::DeviceDetected => "device_detected",
            EventType::DrowsinessDetected => "drowsiness_detected",
            EventType::AudioDetected => "audio_detected",
            EventType::Other(s) => s.as_str(),
        }
    }

    /// Human-readable label for reports
    pub fn label(&self) -> &str {
        match self {
            EventType::FocusLost => "Focus Lost",
            EventType::NoFace => "No Face Detected",
            EventType::MultipleFaces => "Multiple Faces",
            EventType::PhoneDetected => "Phone Detected",
            EventType::BookDetected => "Books/Notes Detected",
            EventType::DeviceDetected => "Other Devices",
            EventType::DrowsinessDetected => "Drowsiness Detected",
            EventType::AudioDetected => "Background Noise",
            EventType::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for EventType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "focus_lost" => EventType::FocusLost,
            "no_face" => EventType::NoFace,
            "multiple_faces" => EventType::MultipleFaces,
            "phone_detected" => EventType::PhoneDetected,
            "book_detected" => EventType::BookDetected,
            "device_detected" => EventType::DeviceDetected,
            "drowsiness_detected" => EventType::DrowsinessDetected,
            "audio_detected" => EventType::AudioDetected,
            _ => EventType::Other(s),
        }
    }
}

impl From<EventType> for String {
    fn from(t: EventType) -> Self {
        match t {
            EventType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable violation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionEvent {
    pub id: String,

    #[serde(rename = "type")]
    pub event_type: EventType,

    /// Creation time (epoch milliseconds on the wire)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,

    /// Elapsed time of the sustained condition that triggered the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,

    /// Detector confidence (object events only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,

    pub description: String,
}

impl DetectionEvent {
    pub fn new(event_type: EventType, description: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: format!("event-{}", Uuid::new_v4()),
            event_type,
            timestamp,
            duration_ms: None,
            confidence: None,
            description: description.into(),
        }
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }
}
