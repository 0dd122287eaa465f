//! Proctoring engine: interpreter, deriver and aggregator behind one tick entry point

use chrono::{DateTime, Utc};
use event_deriver::{DeriverConfig, DetectionEvent, EventDeriver, TickInput};
use face_signal::{FaceSignal, FaceSignalConfig, SignalInterpreter};
use perception::{FaceLandmarks, ObjectDetection};
use serde::{Deserialize, Serialize};
use session::{InterviewSession, SessionAggregator, SessionError};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Engine shared between the tick loop and request handlers
pub type SharedEngine = Arc<RwLock<ProctorEngine>>;

/// Engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub face: FaceSignalConfig,
    pub deriver: DeriverConfig,
}

impl EngineConfig {
    pub fn strict() -> Self {
        Self {
            face: FaceSignalConfig::strict(),
            deriver: DeriverConfig::strict(),
        }
    }

    pub fn lenient() -> Self {
        Self {
            face: FaceSignalConfig::lenient(),
            deriver: DeriverConfig::lenient(),
        }
    }
}

/// Raw perception output for one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(default)]
    pub faces: Vec<FaceLandmarks>,
    #[serde(default)]
    pub detections: Vec<ObjectDetection>,
    #[serde(default)]
    pub loud: bool,
}

impl Observation {
    /// Zero faces, no objects, quiet
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Live dashboard snapshot
#[derive(Debug, Clone, Serialize)]
pub struct LiveStatus {
    pub signal: FaceSignal,
    pub detections: Vec<ObjectDetection>,
    pub loud: bool,
    pub session_active: bool,
    pub session_id: Option<String>,
    pub event_count: usize,
    /// Time since session start (milliseconds)
    pub elapsed_ms: Option<i64>,
    pub ticks: u64,
}

/// Proctoring engine
pub struct ProctorEngine {
    interpreter: SignalInterpreter,
    signal: FaceSignal,
    deriver: EventDeriver,
    sessions: SessionAggregator,
    last_detections: Vec<ObjectDetection>,
    loud: bool,
    ticks: u64,
}

impl ProctorEngine {
    pub fn new(config: EngineConfig) -> Self {
        info!("Creating proctoring engine");
        Self {
            interpreter: SignalInterpreter::new(config.face),
            signal: FaceSignal::default(),
            deriver: EventDeriver::new(config.deriver),
            sessions: SessionAggregator::new(),
            last_detections: Vec::new(),
            loud: false,
            ticks: 0,
        }
    }

    /// Wrap into a [`SharedEngine`]
    pub fn shared(self) -> SharedEngine {
        Arc::new(RwLock::new(self))
    }

    /// Start a session with fresh cooldowns and a fresh face signal
    pub fn start_session(&mut self, candidate_name: &str, now: DateTime<Utc>) -> Result<InterviewSession, SessionError> {
        let session = self.sessions.start_session(candidate_name, now)?.clone();
        self.deriver.reset();
        self.signal.reset();
        Ok(session)
    }

    /// Finalize the active session and discard its cooldowns
    pub fn end_session(&mut self, now: DateTime<Utc>) -> Result<InterviewSession, SessionError> {
        let session = self.sessions.end_session(now)?;
        self.deriver.reset();
        metrics::counter!("proctor_sessions_finalized_total").increment(1);
        Ok(session)
    }

    /// Run one tick.
    ///
    /// The face signal is always updated; events are derived and recorded
    /// only while a session is active.
    pub fn tick(&mut self, observation: Observation, now: DateTime<Utc>) -> Vec<DetectionEvent> {
        self.ticks += 1;
        metrics::counter!("proctor_ticks_total").increment(1);

        self.signal = self.interpreter.interpret(&self.signal, &observation.faces, now);
        self.last_detections = observation.detections;
        self.loud = observation.loud;

        if !self.sessions.is_active() {
            return Vec::new();
        }

        let input = TickInput {
            signal: &self.signal,
            detections: &self.last_detections,
            loud: self.loud,
        };
        let events = self.deriver.tick(input, now);

        for event in &events {
            metrics::counter!("proctor_events_total", "type" => event.event_type.to_string()).increment(1);
            self.sessions.record_event(event.clone());
        }
        if !events.is_empty() {
            debug!("Tick {} emitted {} events", self.ticks, events.len());
        }

        events
    }

    pub fn live_status(&self, now: DateTime<Utc>) -> LiveStatus {
        let active = self.sessions.active();
        LiveStatus {
            signal: self.signal.clone(),
            detections: self.last_detections.clone(),
            loud: self.loud,
            session_active: active.is_some(),
            session_id: active.map(|s| s.id.clone()),
            event_count: active.map(|s| s.events.len()).unwrap_or(0),
            elapsed_ms: active.map(|s| (now - s.start_time).num_milliseconds().max(0)),
            ticks: self.ticks,
        }
    }

    pub fn signal(&self) -> &FaceSignal {
        &self.signal
    }

    pub fn sessions(&self) -> &SessionAggregator {
        &self.sessions
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Default for ProctorEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
