use chrono::{DateTime, Local};
use tracing::{error, info, warn};

use crate::{
    constants::STORAGE_KEYS,
    domain::{Session, SessionDraft, timestamp_id},
    error::StorageError,
};

use super::{SharedStore, read_json_key, write_json_key};

/// Append-mostly history of sessions kept under one key.
///
/// Every operation reads the whole list and writes the whole list back; a
/// failed read never turns into a write.
#[derive(Clone)]
pub struct SessionStore {
    store: SharedStore,
}

impl SessionStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    fn load(&self) -> Result<Vec<Session>, StorageError> {
        Ok(read_json_key(self.store.as_ref(), STORAGE_KEYS.sessions)?.unwrap_or_default())
    }

    fn save(&self, sessions: &[Session]) -> Result<(), StorageError> {
        write_json_key(self.store.as_ref(), STORAGE_KEYS.sessions, sessions)
    }

    pub fn append(&self, session: Session) -> Result<(), StorageError> {
        let result = self.load().and_then(|mut sessions| {
            sessions.push(session);
            self.save(&sessions)
        });
        if let Err(e) = &result {
            error!(error = %e, "saving session failed");
        }
        result
    }

    pub fn record(&self, draft: SessionDraft, at: DateTime<Local>) -> Result<Session, StorageError> {
        let existing = self.load().inspect_err(|e| {
            error!(error = %e, "saving session failed");
        })?;
        let id = timestamp_id(at.timestamp_millis(), |candidate| {
            existing.iter().any(|s| s.id == candidate)
        });
        let session = Session::from_draft(draft, id, at);
        self.append(session.clone())?;
        info!(
            id = %session.id,
            category = %session.category,
            duration_sec = session.duration_sec,
            distractions = session.distractions,
            completed = session.completed,
            "session recorded"
        );
        Ok(session)
    }

    pub fn list_all(&self) -> Vec<Session> {
        self.load().unwrap_or_else(|e| {
            warn!(error = %e, "could not read sessions, showing none");
            Vec::new()
        })
    }

    pub fn delete_by_id(&self, id: &str) -> Result<(), StorageError> {
        let result = self.load().and_then(|mut sessions| {
            sessions.retain(|s| s.id != id);
            self.save(&sessions)
        });
        if let Err(e) = &result {
            error!(id, error = %e, "deleting session failed");
        }
        result
    }

    pub fn delete_all(&self) -> Result<(), StorageError> {
        self.store
            .remove(STORAGE_KEYS.sessions)
            .inspect_err(|e| error!(error = %e, "clearing sessions failed"))
    }

    pub fn update_by_id(&self, updated: Session) -> Result<bool, StorageError> {
        let result = self.load().and_then(|mut sessions| {
            let Some(slot) = sessions.iter_mut().find(|s| s.id == updated.id) else {
                return Ok(false);
            };
            *slot = updated;
            self.save(&sessions).map(|()| true)
        });
        if let Err(e) = &result {
            error!(error = %e, "updating session failed");
        }
        result
    }
}
