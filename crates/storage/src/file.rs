//! JSON file store: one pretty-printed document per session

use crate::{SessionStore, StorageError};
use session::InterviewSession;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory-backed session store
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        info!("Session file store at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a session's document. Ids are restricted to `[A-Za-z0-9_-]`.
    pub fn path_for(&self, id: &str) -> Result<PathBuf, StorageError> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidId(id.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", id)))
    }
}

impl SessionStore for FileStore {
    fn save(&self, session: &InterviewSession) -> Result<(), StorageError> {
        let path = self.path_for(&session.id)?;
        let json = serde_json::to_string_pretty(session)?;

        // Write then rename so readers never see a partial document
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;

        debug!("Wrote {}", path.display());
        Ok(())
    }

    fn load(&self, id: &str) -> Result<InterviewSession, StorageError> {
        let path = self.path_for(id)?;
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(id.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&json)?)
    }
}
