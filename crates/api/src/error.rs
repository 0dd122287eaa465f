//! API error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use session::{ReportError, SessionError};
use storage::StorageError;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Session(#[from] SessionError),

    #[error("{0}")]
    Report(#[from] ReportError),

    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Session(SessionError::EmptyCandidateName) => StatusCode::BAD_REQUEST,
            ApiError::Session(SessionError::AlreadyActive) => StatusCode::CONFLICT,
            ApiError::Session(SessionError::NoActiveSession) => StatusCode::CONFLICT,
            ApiError::Report(ReportError::NotFinalized(_)) => StatusCode::CONFLICT,
            ApiError::Storage(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Storage(StorageError::InvalidId(_)) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Internal error: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}
