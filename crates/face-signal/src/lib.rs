//! Face Signal Interpreter
//!
//! Turns raw face-mesh landmarks into a per-tick attentiveness signal:
//! - Face count
//! - Frontal focus (nose offset from the eye-corner midline)
//! - Drowsiness (sustained low eye aspect ratio)
//! - Streak anchors for "focus lost" and "no face" conditions

pub mod config;
#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;
pub mod geometry;
pub mod interpreter;
pub mod signal;

pub use config::FaceSignalConfig;
pub use interpreter::SignalInterpreter;
pub use signal::FaceSignal;

use thiserror::Error;

/// Signal interpretation error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalError {
    #[error("Landmark {0} missing from face mesh")]
    LandmarkMissing(usize),

    #[error("Degenerate geometry: {0}")]
    Degenerate(&'static str),
}
