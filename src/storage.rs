use std::{
    collections::HashMap,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use chrono::Local;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{constants::BACKUP_SETTINGS, error::StorageError};

pub mod categories;
pub mod preferences;
pub mod sessions;

pub use categories::CategoryRegistry;
pub use preferences::DurationPreference;
pub use sessions::SessionStore;

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

pub type SharedStore = Arc<dyn KeyValueStore>;

pub fn read_json_key<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Malformed {
            key: key.to_string(),
            source,
        })
}

pub fn write_json_key<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &json)
}

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| StorageError::io(format!("create {}", root.display()), e))?;
        Ok(Self { root })
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| StorageError::io(format!("read {}", path.display()), e))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        if path.exists() {
            create_backup(&path)?;
        }
        atomic_write(&path, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        delete_file_if_exists(&self.path_for(key))
    }
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

pub fn delete_file_if_exists(path: &Path) -> Result<(), StorageError> {
    if path.exists() {
        fs::remove_file(path)
            .map_err(|e| StorageError::io(format!("remove {}", path.display()), e))?;
    }
    Ok(())
}

pub fn write_text_file(path: &Path, content: &str) -> Result<(), StorageError> {
    atomic_write(path, content)
}

pub fn create_backup(path: &Path) -> Result<(), StorageError> {
    if !path.exists() {
        return Ok(());
    }

    let backup_err = |source| StorageError::Backup {
        path: path.to_path_buf(),
        source,
    };

    let backup_dir = path
        .parent()
        .unwrap_or(Path::new("."))
        .join(BACKUP_SETTINGS.dir_name);
    fs::create_dir_all(&backup_dir).map_err(backup_err)?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S%.3f");
    let filename = format!(
        "{}.{}",
        path.file_name().unwrap_or_default().to_string_lossy(),
        timestamp
    );
    fs::copy(path, backup_dir.join(&filename)).map_err(backup_err)?;

    let prefix = format!("{}.", path.file_name().unwrap_or_default().to_string_lossy());
    if let Ok(entries) = fs::read_dir(&backup_dir) {
        let mut backups: Vec<_> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(&prefix))
            .collect();
        backups.sort_by_key(|e| e.file_name());

        let excess = backups.len().saturating_sub(BACKUP_SETTINGS.keep);
        for oldest in backups.iter().take(excess) {
            if let Err(e) = fs::remove_file(oldest.path()) {
                warn!(path = %oldest.path().display(), error = %e, "could not prune backup");
            }
        }
    }

    Ok(())
}

pub fn atomic_write(path: &Path, content: &str) -> Result<(), StorageError> {
    let tmp_path = path.with_extension("tmp");
    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| StorageError::io(format!("create {}", tmp_path.display()), e))?;
    tmp_file
        .write_all(content.as_bytes())
        .map_err(|e| StorageError::io(format!("write {}", tmp_path.display()), e))?;
    tmp_file
        .sync_all()
        .map_err(|e| StorageError::io(format!("sync {}", tmp_path.display()), e))?;
    fs::rename(&tmp_path, path)
        .map_err(|e| StorageError::io(format!("rename to {}", path.display()), e))?;
    debug!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(())
}


#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use tempfile::TempDir;

    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestJsonValue {
        name: String,
        count: usize,
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert_eq!(store.get("alpha").unwrap(), None);
        store.set("alpha", "[1,2,3]").unwrap();
        assert_eq!(store.get("alpha").unwrap().as_deref(), Some("[1,2,3]"));
        assert!(dir.path().join("alpha.json").exists());
        assert!(!dir.path().join("alpha.tmp").exists());

        store.remove("alpha").unwrap();
        assert_eq!(store.get("alpha").unwrap(), None);
        store.remove("alpha").unwrap();
    }

    #[test]
    fn test_json_key_helpers() {
        let store = MemoryStore::new();
        let value = TestJsonValue {
            name: "sample".to_string(),
            count: 3,
        };

        write_json_key(&store, "k", &value).unwrap();
        let loaded: Option<TestJsonValue> = read_json_key(&store, "k").unwrap();
        assert_eq!(loaded, Some(value));

        store.set("k", "{not json").unwrap();
        let err = read_json_key::<TestJsonValue>(&store, "k").unwrap_err();
        assert!(matches!(err, StorageError::Malformed { .. }));
    }

    #[test]
    fn test_overwrite_keeps_backup_of_previous_value() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set("list", "[1]").unwrap();
        store.set("list", "[1,2]").unwrap();

        let backups: Vec<_> = fs::read_dir(dir.path().join(BACKUP_SETTINGS.dir_name))
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(fs::read_to_string(backups[0].path()).unwrap(), "[1]");
    }

    #[test]
    fn test_backups_are_pruned() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        for i in 0..(BACKUP_SETTINGS.keep + 5) {
            store.set("list", &format!("[{}]", i)).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(2));
        }

        let count = fs::read_dir(dir.path().join(BACKUP_SETTINGS.dir_name))
            .unwrap()
            .count();
        assert_eq!(count, BACKUP_SETTINGS.keep);
    }
}
