//! Perception adapters for the proctoring monitor
//!
//! The perception models themselves are black boxes. This crate defines the
//! capabilities the monitor consumes from them:
//! - Face landmarks (one point set per detected face)
//! - Object detection (labeled boxes with confidence)
//! - Audio loudness (averaged spectrum level on a 0-255 scale)

pub mod adapter;
pub mod audio;
pub mod frame;
pub mod landmarks;
pub mod object;

pub use adapter::{AudioMeter, FaceLandmarker, FrameSource, ObjectDetector};
pub use audio::{AudioLevel, LoudnessConfig, SpectrumLoudnessMeter};
pub use frame::MediaFrame;
pub use landmarks::{FaceLandmarks, Landmark};
pub use object::{is_relevant_class, BoundingBox, ObjectDetection, RELEVANT_CLASSES};

use thiserror::Error;

/// Perception error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PerceptionError {
    /// Camera permission denied, model failed to load, ...
    #[error("Adapter unavailable: {0}")]
    Unavailable(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Malformed result: {0}")]
    MalformedResult(String),

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),
}
