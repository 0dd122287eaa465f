//! Tick loop

use chrono::Utc;
use perception::{AudioMeter, FaceLandmarker, FrameSource, MediaFrame, ObjectDetector, PerceptionError};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::{MonitorError, Observation, SharedEngine};

/// Tick loop configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Pause between ticks (milliseconds); 0 only yields to the runtime
    pub tick_interval_ms: u64,
}

/// Stops a running [`MonitorLoop`]
#[derive(Debug, Clone, Default)]
pub struct MonitorHandle {
    stop: Arc<AtomicBool>,
}

impl MonitorHandle {
    /// Ask the loop to exit after the current tick. Idempotent.
    pub fn stop(&self) {
        if !self.stop.swap(true, Ordering::SeqCst) {
            info!("Stopping monitor loop");
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }
}

/// Pulls frames from a source and runs the adapters once per tick
pub struct MonitorLoop<S, F, O, A> {
    source: S,
    faces: F,
    objects: O,
    audio: A,
    engine: SharedEngine,
    config: LoopConfig,
    handle: MonitorHandle,
}

impl<S, F, O, A> MonitorLoop<S, F, O, A>
where
    S: FrameSource,
    F: FaceLandmarker,
    O: ObjectDetector,
    A: AudioMeter,
{
    pub fn new(source: S, faces: F, objects: O, audio: A, engine: SharedEngine, config: LoopConfig) -> Self {
        Self {
            source,
            faces,
            objects,
            audio,
            engine,
            config,
            handle: MonitorHandle::default(),
        }
    }

    pub fn handle(&self) -> MonitorHandle {
        self.handle.clone()
    }

    /// Run until stopped. Returns the number of ticks driven.
    ///
    /// Every adapter is initialized before the first tick; if one is
    /// unavailable the loop does not start. Adapters are released only after
    /// the last tick has completed.
    pub async fn run(mut self) -> Result<u64, MonitorError> {
        self.initialize()?;
        info!("Monitor loop started");

        let mut ticks = 0u64;
        while !self.handle.is_stopped() {
            if let Some((observation, now)) = self.observe() {
                self.engine.write().await.tick(observation, now);
                ticks += 1;
            }

            if self.config.tick_interval_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.tick_interval_ms)).await;
            } else {
                tokio::task::yield_now().await;
            }
        }

        self.release();
        info!("Monitor loop stopped after {} ticks", ticks);
        Ok(ticks)
    }

    fn initialize(&mut self) -> Result<(), MonitorError> {
        if let Err(e) = self.source.open() {
            return Err(MonitorError::AdapterUnavailable("camera", e));
        }
        if let Err(e) = self.faces.initialize() {
            self.source.close();
            return Err(MonitorError::AdapterUnavailable("face", e));
        }
        if let Err(e) = self.objects.initialize() {
            self.faces.release();
            self.source.close();
            return Err(MonitorError::AdapterUnavailable("object", e));
        }
        if let Err(e) = self.audio.initialize() {
            self.objects.release();
            self.faces.release();
            self.source.close();
            return Err(MonitorError::AdapterUnavailable("audio", e));
        }
        Ok(())
    }

    fn release(&mut self) {
        self.audio.release();
        self.objects.release();
        self.faces.release();
        self.source.close();
        debug!("Adapters released");
    }

    /// Latest observation, or `None` while no frame is ready
    fn observe(&mut self) -> Option<(Observation, chrono::DateTime<Utc>)> {
        let frame = match self.source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return None,
            Err(e) => {
                perception_failure("camera", &e);
                return Some((Observation::empty(), Utc::now()));
            }
        };

        let observation = Observation {
            faces: self.detect_faces(&frame),
            detections: self.detect_objects(&frame),
            loud: self.measure_loudness(&frame),
        };
        Some((observation, frame.timestamp))
    }

    fn detect_faces(&mut self, frame: &MediaFrame) -> Vec<perception::FaceLandmarks> {
        if !frame.has_video() {
            return Vec::new();
        }
        self.faces.detect(frame).unwrap_or_else(|e| {
            perception_failure("face", &e);
            Vec::new()
        })
    }

    fn detect_objects(&mut self, frame: &MediaFrame) -> Vec<perception::ObjectDetection> {
        if !frame.has_video() {
            return Vec::new();
        }
        self.objects.detect(frame).unwrap_or_else(|e| {
            perception_failure("object", &e);
            Vec::new()
        })
    }

    fn measure_loudness(&mut self, frame: &MediaFrame) -> bool {
        if !frame.has_audio() {
            return false;
        }
        match self.audio.measure(frame) {
            Ok(level) => level.is_loud(self.audio.threshold()),
            Err(e) => {
                perception_failure("audio", &e);
                false
            }
        }
    }
}

fn perception_failure(adapter: &'static str, error: &PerceptionError) {
    warn!("{} adapter failed, treating tick as no detection: {}", adapter, error);
    metrics::counter!("proctor_perception_failures_total", "adapter" => adapter).increment(1);
}
