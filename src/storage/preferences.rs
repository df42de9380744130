use tracing::warn;

use crate::{
    constants::{DEFAULT_DURATION_MINUTES, STORAGE_KEYS},
    domain::parse_minutes,
    error::StorageError,
};

use super::SharedStore;

#[derive(Clone)]
pub struct DurationPreference {
    store: SharedStore,
}

impl DurationPreference {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn load_minutes(&self) -> u32 {
        match self.store.get(STORAGE_KEYS.duration_minutes) {
            Ok(Some(raw)) => parse_minutes(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "ignoring stored duration");
                DEFAULT_DURATION_MINUTES
            }),
            Ok(None) => DEFAULT_DURATION_MINUTES,
            Err(e) => {
                warn!(error = %e, "could not read stored duration");
                DEFAULT_DURATION_MINUTES
            }
        }
    }

    pub fn save_minutes(&self, minutes: u32) -> Result<(), StorageError> {
        self.store
            .set(STORAGE_KEYS.duration_minutes, &minutes.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore, test_support::FailingStore};

    #[test]
    fn test_defaults_when_missing_or_broken() {
        let backing = Arc::new(MemoryStore::new());
        let pref = DurationPreference::new(backing.clone());
        assert_eq!(pref.load_minutes(), DEFAULT_DURATION_MINUTES);

        backing.set(STORAGE_KEYS.duration_minutes, "abc").unwrap();
        assert_eq!(pref.load_minutes(), DEFAULT_DURATION_MINUTES);

        let failing = DurationPreference::new(Arc::new(FailingStore::reads()));
        assert_eq!(failing.load_minutes(), DEFAULT_DURATION_MINUTES);
    }

    #[test]
    fn test_saved_minutes_are_numeric_strings() {
        let backing = Arc::new(MemoryStore::new());
        let pref = DurationPreference::new(backing.clone());

        pref.save_minutes(50).unwrap();
        assert_eq!(
            backing.get(STORAGE_KEYS.duration_minutes).unwrap().as_deref(),
            Some("50")
        );
        assert_eq!(pref.load_minutes(), 50);
    }
}
