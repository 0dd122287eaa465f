//! Storage Layer
//!
//! Persists finalized interview sessions behind the [`SessionStore`] trait:
//! - [`Repository`]: in-memory with bounded retention
//! - [`FileStore`]: one JSON document per session
//!
//! [`persist_detached`] runs a save off the tick path and reports the outcome
//! on a oneshot channel; [`PersistenceTracker`] keeps that outcome per session.

mod file;
mod repository;
mod tracker;

pub use file::FileStore;
pub use repository::{Repository, DEFAULT_MAX_SESSIONS};
pub use tracker::{PersistenceRecord, PersistenceStatus, PersistenceTracker};

use session::InterviewSession;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Lock error: {0}")]
    LockPoisoned(String),
    #[error("Session not found: {0}")]
    NotFound(String),
    #[error("Invalid session id: {0}")]
    InvalidId(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Persistence task failed: {0}")]
    TaskFailed(String),
}

/// Session persistence capability
pub trait SessionStore: Send + Sync {
    /// Store a session, replacing any previous copy with the same id
    fn save(&self, session: &InterviewSession) -> Result<(), StorageError>;

    /// Load a session by id
    fn load(&self, id: &str) -> Result<InterviewSession, StorageError>;
}

/// Save a session on a blocking task without waiting for it.
///
/// The in-memory session is untouched whatever the outcome; failures are
/// logged and delivered on the returned channel.
pub fn persist_detached(
    store: Arc<dyn SessionStore>,
    session: InterviewSession,
) -> oneshot::Receiver<Result<(), StorageError>> {
    let (tx, rx) = oneshot::channel();
    let id = session.id.clone();

    tokio::spawn(async move {
        let result = match tokio::task::spawn_blocking(move || store.save(&session)).await {
            Ok(result) => result,
            Err(e) => Err(StorageError::TaskFailed(e.to_string())),
        };

        match &result {
            Ok(()) => debug!("Persisted session {}", id),
            Err(e) => warn!("Failed to persist session {}: {}", id, e),
        }

        // Receiver may have been dropped
        let _ = tx.send(result);
    });

    rx
}
