//! Session Routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use session::InterviewSession;
use storage::{persist_detached, PersistenceRecord, StorageError};
use tracing::info;

use crate::{ApiError, ApiResult, SharedState};

/// Body of a session start request
#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    #[serde(default)]
    pub candidate_name: String,
}

/// Start a session
pub async fn start_session(
    State(state): State<SharedState>,
    Json(request): Json<StartSessionRequest>,
) -> ApiResult<(StatusCode, Json<InterviewSession>)> {
    let state = state.read().await;
    let session = state
        .engine
        .write()
        .await
        .start_session(&request.candidate_name, Utc::now())?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// Finalize the active session and hand it to persistence
pub async fn end_session(State(state): State<SharedState>) -> ApiResult<Json<InterviewSession>> {
    let state = state.read().await;
    let session = state.engine.write().await.end_session(Utc::now())?;

    state.repository.insert(session.clone())?;
    if let Some(store) = &state.durable {
        let outcome = persist_detached(store.clone(), session.clone());
        state.persistence.track(session.id.clone(), outcome);
    }

    info!(
        "Session {} ended with integrity score {}",
        session.id, session.integrity_score
    );
    Ok(Json(session))
}

/// Active session, else the last finalized one
pub async fn current_session(State(state): State<SharedState>) -> ApiResult<Json<InterviewSession>> {
    let state = state.read().await;
    let engine = state.engine.read().await;
    engine
        .sessions()
        .current()
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("no session".to_string()))
}

/// Stored session by id
pub async fn get_session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<InterviewSession>> {
    let state = state.read().await;
    if let Some(session) = state.repository.get(&id)? {
        return Ok(Json(session));
    }

    match &state.durable {
        Some(store) => Ok(Json(store.load(&id)?)),
        None => Err(StorageError::NotFound(id).into()),
    }
}

/// Durable save outcome for a finalized session
pub async fn persistence_status(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PersistenceRecord>> {
    let state = state.read().await;
    match state.persistence.status(&id) {
        Some(status) => Ok(Json(PersistenceRecord { session_id: id, status })),
        None => Err(ApiError::NotFound(format!("no persistence record for {}", id))),
    }
}
