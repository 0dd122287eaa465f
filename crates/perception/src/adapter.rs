//! Adapter capabilities consumed by the monitoring loop

use crate::{AudioLevel, FaceLandmarks, MediaFrame, ObjectDetection, PerceptionError};

/// Face-landmark model (e.g. a face mesh with up to two faces)
pub trait FaceLandmarker: Send {
    /// Load the model. Failure means the adapter is unavailable.
    fn initialize(&mut self) -> Result<(), PerceptionError> {
        Ok(())
    }

    /// One landmark set per detected face; no face is an empty vec, not an error
    fn detect(&mut self, frame: &MediaFrame) -> Result<Vec<FaceLandmarks>, PerceptionError>;

    /// Release model resources
    fn release(&mut self) {}
}

/// Object-detection model
pub trait ObjectDetector: Send {
    fn initialize(&mut self) -> Result<(), PerceptionError> {
        Ok(())
    }

    fn detect(&mut self, frame: &MediaFrame) -> Result<Vec<ObjectDetection>, PerceptionError>;

    fn release(&mut self) {}
}

/// Audio loudness analysis
pub trait AudioMeter: Send {
    fn initialize(&mut self) -> Result<(), PerceptionError> {
        Ok(())
    }

    fn measure(&mut self, frame: &MediaFrame) -> Result<AudioLevel, PerceptionError>;

    /// Level above which the frame counts as loud
    fn threshold(&self) -> f32 {
        50.0
    }

    fn release(&mut self) {}
}

/// Camera/microphone stream
pub trait FrameSource: Send {
    /// Open the stream. Failure (e.g. permission denied) means the adapter is unavailable.
    fn open(&mut self) -> Result<(), PerceptionError> {
        Ok(())
    }

    /// Latest frame, or `None` while the stream is not ready yet
    fn next_frame(&mut self) -> Result<Option<MediaFrame>, PerceptionError>;

    fn close(&mut self) {}
}
