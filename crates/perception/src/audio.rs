//! Spectrum-based loudness metering

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::adapter::AudioMeter;
use crate::{MediaFrame, PerceptionError};

/// Loudness configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoudnessConfig {
    /// Average byte level above which audio counts as loud (0-255)
    pub threshold: f32,

    /// FFT window size (samples)
    pub fft_size: usize,

    /// Level mapped to byte 0 (dBFS)
    pub min_db: f32,

    /// Level mapped to byte 255 (dBFS)
    pub max_db: f32,
}

impl Default for LoudnessConfig {
    fn default() -> Self {
        Self {
            threshold: 50.0,
            fft_size: 2048,
            min_db: -100.0,
            max_db: -30.0,
        }
    }
}

/// Averaged frequency-domain amplitude on a 0-255 scale
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioLevel {
    pub average: f32,
}

impl AudioLevel {
    pub fn new(average: f32) -> Self {
        Self { average }
    }

    /// Strictly above the threshold is loud
    pub fn is_loud(&self, threshold: f32) -> bool {
        self.average > threshold
    }
}

/// Loudness meter producing analyser-style byte spectra.
///
/// Each bin magnitude is scaled by 1/N, converted to dB and mapped linearly
/// from `[min_db, max_db]` onto `[0, 255]`; the level is the mean over the
/// `fft_size / 2` bins.
pub struct SpectrumLoudnessMeter {
    config: LoudnessConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
}

impl SpectrumLoudnessMeter {
    pub fn new(config: LoudnessConfig) -> Self {
        let size = config.fft_size.max(2);
        let fft = FftPlanner::new().plan_fft_forward(size);
        let window = blackman_window(size);
        debug!("Planned {}-point FFT for loudness metering", size);
        Self {
            config: LoudnessConfig {
                fft_size: size,
                ..config
            },
            fft,
            window,
        }
    }

    pub fn config(&self) -> &LoudnessConfig {
        &self.config
    }

    /// Byte spectrum for the most recent `fft_size` samples (zero-padded)
    pub fn byte_spectrum(&self, samples: &[f32]) -> Vec<u8> {
        let n = self.config.fft_size;
        let tail = &samples[samples.len().saturating_sub(n)..];

        let mut buffer: Vec<Complex<f32>> = (0..n)
            .map(|i| {
                let s = tail.get(i).copied().unwrap_or(0.0);
                Complex::new(s * self.window[i], 0.0)
            })
            .collect();
        self.fft.process(&mut buffer);

        let range = self.config.max_db - self.config.min_db;
        buffer
            .iter()
            .take(n / 2)
            .map(|c| {
                let magnitude = c.norm() / n as f32;
                let db = if magnitude > 0.0 {
                    20.0 * magnitude.log10()
                } else {
                    f32::NEG_INFINITY
                };
                let scaled = 255.0 * (db - self.config.min_db) / range;
                scaled.clamp(0.0, 255.0) as u8
            })
            .collect()
    }

    /// Average byte level of a sample block
    pub fn level(&self, samples: &[f32]) -> AudioLevel {
        if samples.is_empty() {
            return AudioLevel::default();
        }
        let spectrum = self.byte_spectrum(samples);
        let sum: u32 = spectrum.iter().map(|&v| v as u32).sum();
        AudioLevel::new(sum as f32 / spectrum.len() as f32)
    }

    /// Level compared against the configured threshold
    pub fn is_loud(&self, samples: &[f32]) -> bool {
        self.level(samples).is_loud(self.config.threshold)
    }
}

impl Default for SpectrumLoudnessMeter {
    fn default() -> Self {
        Self::new(LoudnessConfig::default())
    }
}

impl AudioMeter for SpectrumLoudnessMeter {
    fn measure(&mut self, frame: &MediaFrame) -> Result<AudioLevel, PerceptionError> {
        if frame.audio.iter().any(|s| !s.is_finite()) {
            return Err(PerceptionError::MalformedResult("non-finite audio sample".into()));
        }
        Ok(self.level(&frame.audio))
    }

    fn threshold(&self) -> f32 {
        self.config.threshold
    }
}

fn blackman_window(n: usize) -> Vec<f32> {
    let alpha = 0.16_f32;
    let a0 = 0.5 * (1.0 - alpha);
    let a1 = 0.5;
    let a2 = 0.5 * alpha;
    (0..n)
        .map(|i| {
            let x = i as f32 / n as f32;
            a0 - a1 * (2.0 * std::f32::consts::PI * x).cos()
                + a2 * (4.0 * std::f32::consts::PI * x).cos()
        })
        .collect()
}
