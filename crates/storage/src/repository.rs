//! Repository Implementation

use crate::{SessionStore, StorageError};
use session::InterviewSession;
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::{debug, info};

/// Default number of sessions retained in memory
pub const DEFAULT_MAX_SESSIONS: usize = 1_000;

/// In-memory session repository with bounded retention
pub struct Repository {
    /// Oldest first
    sessions: Mutex<VecDeque<InterviewSession>>,
    max_sessions: usize,
}

impl Repository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self::with_retention(DEFAULT_MAX_SESSIONS)
    }

    /// Create a repository keeping at most `max_sessions` sessions
    pub fn with_retention(max_sessions: usize) -> Self {
        info!("Creating in-memory session repository (retention {})", max_sessions);
        Self {
            sessions: Mutex::new(VecDeque::with_capacity(max_sessions.min(1024))),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Insert or replace a session
    pub fn insert(&self, session: InterviewSession) -> Result<(), StorageError> {
        let mut sessions = self.sessions.lock().map_err(|e| {
            StorageError::LockPoisoned(e.to_string())
        })?;

        sessions.retain(|s| s.id != session.id);

        // Enforce retention
        while sessions.len() >= self.max_sessions {
            if let Some(evicted) = sessions.pop_front() {
                debug!("Evicting session {}", evicted.id);
            }
        }

        debug!("Stored session {}", session.id);
        sessions.push_back(session);
        Ok(())
    }

    /// Look up a session by id
    pub fn get(&self, id: &str) -> Result<Option<InterviewSession>, StorageError> {
        let sessions = self.sessions.lock().map_err(|e| {
            StorageError::LockPoisoned(e.to_string())
        })?;

        Ok(sessions.iter().find(|s| s.id == id).cloned())
    }

    /// Most recently stored sessions, newest first
    pub fn recent(&self, limit: usize) -> Result<Vec<InterviewSession>, StorageError> {
        let sessions = self.sessions.lock().map_err(|e| {
            StorageError::LockPoisoned(e.to_string())
        })?;

        Ok(sessions.iter().rev().take(limit).cloned().collect())
    }

    pub fn count(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn clear(&self) {
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.clear();
        }
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for Repository {
    fn save(&self, session: &InterviewSession) -> Result<(), StorageError> {
        self.insert(session.clone())
    }

    fn load(&self, id: &str) -> Result<InterviewSession, StorageError> {
        self.get(id)?.ok_or_else(|| StorageError::NotFound(id.to_string()))
    }
}
