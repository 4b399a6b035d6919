//! Platform-specific storage implementations
//!
//! [`FileStorage`] keeps one file per key under the platform data directory,
//! which is what the browser's local storage becomes outside a browser.
//! [`MemoryStorage`] backs tests and dry runs.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::domain::repositories::KeyValueStore;
use crate::shared::constants::DATA_DIR_NAME;
use crate::shared::error::BurnError;

const VALUE_EXTENSION: &str = "dat";

/// File-backed key/value storage
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, BurnError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            BurnError::storage(format!("Failed to create data dir {}: {}", root.display(), e))
        })?;
        Ok(Self { root })
    }

    /// `<platform data dir>/baseburn`, or `./data/baseburn` when the platform has none
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("./data"))
            .join(DATA_DIR_NAME)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // Keys become file names, so only a conservative alphabet is allowed.
    fn file_path(&self, key: &str) -> Result<PathBuf, BurnError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(BurnError::storage(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.root.join(format!("{}.{}", key, VALUE_EXTENSION)))
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, BurnError> {
        let path = self.file_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BurnError::storage(format!("Read of {} failed: {}", key, e))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BurnError> {
        let path = self.file_path(key)?;
        let tmp = path.with_extension(format!("{}.tmp", VALUE_EXTENSION));

        let mut file = File::create(&tmp)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        drop(file);

        // rename is atomic, so a crash never leaves a half-written value behind
        fs::rename(&tmp, &path)
            .map_err(|e| BurnError::storage(format!("Write of {} failed: {}", key, e)))
    }

    fn remove(&self, key: &str) -> Result<(), BurnError> {
        match fs::remove_file(self.file_path(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>, BurnError> {
        let mut keys = vec![];
        for entry in fs::read_dir(&self.root)?.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(VALUE_EXTENSION) {
                if let Some(name) = path.file_stem().and_then(|n| n.to_str()) {
                    keys.push(name.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// In-memory key/value storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, BurnError> {
        self.data
            .lock()
            .map_err(|_| BurnError::internal("Memory storage lock poisoned"))
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, BurnError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BurnError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BurnError> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, BurnError> {
        let mut keys: Vec<String> = self.lock()?.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path()).expect("storage");

        assert_eq!(storage.get("burner-points").unwrap(), None);
        storage.set("burner-points", "250").unwrap();
        assert_eq!(storage.get("burner-points").unwrap().as_deref(), Some("250"));

        storage.set("burner-points", "300").unwrap();
        assert_eq!(storage.get("burner-points").unwrap().as_deref(), Some("300"));
        assert_eq!(storage.keys().unwrap(), vec!["burner-points".to_string()]);

        storage.remove("burner-points").unwrap();
        storage.remove("burner-points").unwrap();
        assert_eq!(storage.get("burner-points").unwrap(), None);
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        FileStorage::new(dir.path())
            .unwrap()
            .set("burn-history", "[]")
            .unwrap();

        let reopened = FileStorage::new(dir.path()).unwrap();
        assert_eq!(reopened.get("burn-history").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_storage_rejects_path_like_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path()).unwrap();

        assert!(storage.set("../escape", "x").is_err());
        assert!(storage.get("").is_err());
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        storage.set("a", "1").unwrap();
        storage.set("b", "2").unwrap();

        assert_eq!(storage.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(storage.keys().unwrap(), vec!["a", "b"]);
        storage.remove("a").unwrap();
        assert_eq!(storage.get("a").unwrap(), None);
    }
}
