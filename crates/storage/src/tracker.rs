//! Outcome tracking for detached saves

use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::repository::DEFAULT_MAX_SESSIONS;
use crate::StorageError;

/// Durable save state of one session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PersistenceStatus {
    Pending,
    Saved,
    Failed { message: String },
}

/// Save outcome for a session id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersistenceRecord {
    pub session_id: String,
    #[serde(flatten)]
    pub status: PersistenceStatus,
}

/// Records the outcome of each detached save so clients can be warned
/// about failures after the fact. Oldest records are evicted past capacity.
#[derive(Debug, Clone)]
pub struct PersistenceTracker {
    records: Arc<Mutex<VecDeque<PersistenceRecord>>>,
    capacity: usize,
}

impl PersistenceTracker {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_SESSIONS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Arc::new(Mutex::new(VecDeque::new())),
            capacity: capacity.max(1),
        }
    }

    // Records are plain values, so a poisoned lock still holds usable data
    fn records(&self) -> MutexGuard<'_, VecDeque<PersistenceRecord>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set(&self, session_id: &str, status: PersistenceStatus) {
        let mut records = self.records();
        if let Some(record) = records.iter_mut().find(|r| r.session_id == session_id) {
            record.status = status;
            return;
        }
        records.push_back(PersistenceRecord {
            session_id: session_id.to_string(),
            status,
        });
        while records.len() > self.capacity {
            records.pop_front();
        }
    }

    /// Mark the session pending and settle it when the save reports back
    pub fn track(
        &self,
        session_id: impl Into<String>,
        outcome: oneshot::Receiver<Result<(), StorageError>>,
    ) -> JoinHandle<()> {
        let session_id = session_id.into();
        self.set(&session_id, PersistenceStatus::Pending);

        let tracker = self.clone();
        tokio::spawn(async move {
            let status = match outcome.await {
                Ok(Ok(())) => PersistenceStatus::Saved,
                Ok(Err(e)) => PersistenceStatus::Failed { message: e.to_string() },
                Err(_) => {
                    warn!("Persistence task for {} ended without reporting", session_id);
                    PersistenceStatus::Failed {
                        message: "persistence task ended without reporting".to_string(),
                    }
                }
            };
            tracker.set(&session_id, status);
        })
    }

    pub fn status(&self, session_id: &str) -> Option<PersistenceStatus> {
        self.records()
            .iter()
            .find(|r| r.session_id == session_id)
            .map(|r| r.status.clone())
    }

    /// Most recently tracked save
    pub fn latest(&self) -> Option<PersistenceRecord> {
        self.records().back().cloned()
    }
}

impl Default for PersistenceTracker {
    fn default() -> Self {
        Self::new()
    }
}
