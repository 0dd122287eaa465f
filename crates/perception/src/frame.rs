//! Media frame types

use chrono::{DateTime, Utc};

/// One captured instant of the candidate stream: a decoded RGB picture plus
/// the PCM audio block that arrived with it.
#[derive(Debug, Clone)]
pub struct MediaFrame {
    /// Frame sequence number
    pub sequence: u64,
    /// Capture time
    pub timestamp: DateTime<Utc>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// RGB pixel data (width * height * 3)
    pub pixels: Vec<u8>,
    /// Mono PCM samples in [-1, 1]
    pub audio: Vec<f32>,
    /// Audio sample rate (Hz)
    pub sample_rate: u32,
}

impl MediaFrame {
    /// Create a video-only frame
    pub fn new(sequence: u64, timestamp: DateTime<Utc>, width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            sequence,
            timestamp,
            width,
            height,
            pixels,
            audio: Vec::new(),
            sample_rate: 48_000,
        }
    }

    /// Attach an audio block to the frame
    pub fn with_audio(mut self, audio: Vec<f32>, sample_rate: u32) -> Self {
        self.audio = audio;
        self.sample_rate = sample_rate;
        self
    }

    /// Whether the frame carries a complete picture.
    ///
    /// Mirrors the "video has dimensions and enough data" readiness check a
    /// perception model needs before it can run.
    pub fn has_video(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.pixels.len()
                >= (self.width as usize)
                    .saturating_mul(self.height as usize)
                    .saturating_mul(3)
    }

    /// Whether the frame carries audio
    pub fn has_audio(&self) -> bool {
        !self.audio.is_empty()
    }
}
