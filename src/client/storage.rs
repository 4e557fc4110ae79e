//! Durable key/value storage for the client session.
//!
//! Values are plain strings with no envelope. `FileStorage` keeps them in a
//! JSON map at `<data dir>/skillswap/storage.json`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};

/// Application name used for the data directory path
const APP_NAME: &str = "skillswap";

/// Storage file name
const STORAGE_FILE: &str = "storage.json";

pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory storage lock poisoned"))
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

pub struct FileStorage {
    path: PathBuf,
    // serializes read-modify-write cycles within the process
    guard: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    /// Storage file in the platform data directory.
    pub fn default_location() -> Result<Self> {
        let data_dir =
            dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(Self::new(data_dir.join(APP_NAME).join(STORAGE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents =
            std::fs::read_to_string(&self.path).context("Failed to read storage file")?;
        serde_json::from_str(&contents).context("Failed to parse storage file")
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, contents).context("Failed to write storage file")?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let _held = self
            .guard
            .lock()
            .map_err(|_| anyhow::anyhow!("file storage lock poisoned"))?;
        let mut entries = self.load()?;
        f(&mut entries);
        self.save(&entries)
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|m| {
            m.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.update(|m| {
            m.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_set_get_remove() {
        let s = MemoryStorage::new();
        assert_eq!(s.get("k").unwrap(), None);
        s.set("k", "v").unwrap();
        assert_eq!(s.get("k").unwrap().as_deref(), Some("v"));
        s.remove("k").unwrap();
        assert_eq!(s.get("k").unwrap(), None);
    }

    #[test]
    fn file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let first = FileStorage::new(&path);
        first.set("skillswap_token", "abc").unwrap();
        first.set("skillswap_user_email", "johndoe").unwrap();

        let second = FileStorage::new(&path);
        assert_eq!(second.get("skillswap_token").unwrap().as_deref(), Some("abc"));
        second.remove("skillswap_token").unwrap();

        assert_eq!(first.get("skillswap_token").unwrap(), None);
        assert_eq!(first.get("skillswap_user_email").unwrap().as_deref(), Some("johndoe"));
    }

    #[test]
    fn file_storage_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let s = FileStorage::new(dir.path().join("absent.json"));
        assert_eq!(s.get("anything").unwrap(), None);
        s.remove("anything").unwrap();
    }

    #[test]
    fn default_location_is_under_app_data_dir() {
        // headless CI images may have no data dir at all
        let Some(data_dir) = dirs::data_dir() else {
            assert!(FileStorage::default_location().is_err());
            return;
        };
        let storage = FileStorage::default_location().unwrap();
        assert!(storage.path().starts_with(data_dir));
        assert!(storage.path().ends_with(Path::new(APP_NAME).join(STORAGE_FILE)));
    }

    #[test]
    fn file_storage_reports_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = FileStorage::new(&path).get("k").unwrap_err();
        assert!(err.to_string().contains("parse"));
    }
}
