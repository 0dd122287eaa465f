//! Tick and live status routes

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use event_deriver::DetectionEvent;
use monitor::{LiveStatus, Observation};
use perception::{AudioLevel, FaceLandmarks, ObjectDetection};
use serde::{Deserialize, Serialize};
use storage::PersistenceRecord;

use crate::SharedState;

/// Perception output pushed by a client for one tick
#[derive(Debug, Deserialize)]
pub struct TickRequest {
    #[serde(default)]
    pub faces: Vec<FaceLandmarks>,
    #[serde(default)]
    pub detections: Vec<ObjectDetection>,
    /// Loudness decision made by the client
    pub loud: Option<bool>,
    /// Raw analyser level (0-255), compared against the configured threshold
    pub audio_level: Option<f32>,
    /// Tick time; defaults to the time of arrival
    pub timestamp: Option<DateTime<Utc>>,
}

/// Response to a tick
#[derive(Debug, Serialize)]
pub struct TickResponse {
    pub events: Vec<DetectionEvent>,
    pub status: LiveStatus,
}

/// Run one tick
pub async fn post_tick(
    State(state): State<SharedState>,
    Json(request): Json<TickRequest>,
) -> Json<TickResponse> {
    let state = state.read().await;
    let now = request.timestamp.unwrap_or_else(Utc::now);

    let threshold = state.loudness.threshold;
    let loud = request.loud.unwrap_or_else(|| {
        request
            .audio_level
            .map(|level| AudioLevel::new(level).is_loud(threshold))
            .unwrap_or(false)
    });

    let observation = Observation {
        faces: request.faces,
        detections: request.detections,
        loud,
    };

    let mut engine = state.engine.write().await;
    let events = engine.tick(observation, now);

    Json(TickResponse {
        events,
        status: engine.live_status(now),
    })
}

/// Live status plus the outcome of the latest durable save
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub live: LiveStatus,
    pub persistence: Option<PersistenceRecord>,
}

/// Live status snapshot
pub async fn get_status(State(state): State<SharedState>) -> Json<StatusResponse> {
    let state = state.read().await;
    let engine = state.engine.read().await;
    Json(StatusResponse {
        live: engine.live_status(Utc::now()),
        persistence: state.persistence.latest(),
    })
}
