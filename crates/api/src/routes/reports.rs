//! Report Routes

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};
use session::{report_file_name, to_csv, InterviewSession, ReportError, SessionReport};

use crate::{ApiError, ApiResult, SharedState};

async fn finalized_session(state: &SharedState) -> ApiResult<InterviewSession> {
    let state = state.read().await;
    let engine = state.engine.read().await;
    let session = engine
        .sessions()
        .current()
        .ok_or_else(|| ApiError::NotFound("no session".to_string()))?;

    if !session.is_finalized() {
        return Err(ReportError::NotFinalized(session.id.clone()).into());
    }
    Ok(session.clone())
}

/// Plain-text report of the last finalized session
pub async fn text_report(State(state): State<SharedState>) -> ApiResult<impl IntoResponse> {
    let session = finalized_session(&state).await?;
    let text = SessionReport::from_session(&session)?.render_text();

    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string())], text))
}

/// CSV export of the last finalized session
pub async fn csv_report(State(state): State<SharedState>) -> ApiResult<impl IntoResponse> {
    let session = finalized_session(&state).await?;
    // Header values must be visible ASCII
    let file_name: String = report_file_name(&session.candidate_name, "csv")
        .chars()
        .filter(|c| c.is_ascii_graphic() && *c != '"')
        .collect();
    let disposition = format!("attachment; filename=\"{}\"", file_name);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        to_csv(&session),
    ))
}
