//! Level persistence
//!
//! A single JSON record, `{ "level": N }`, stored under a fixed key in a
//! key/value backend (LocalStorage on web, memory elsewhere). Reads fail
//! closed: anything unreadable counts as level 1.

pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod local;

pub use memory::MemoryStorage;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

use serde::{Deserialize, Serialize};

use crate::error::{BlockDropError, Result};

/// Persisted level progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub level: u32,
}

impl Default for LevelProgress {
    fn default() -> Self {
        Self { level: 1 }
    }
}

/// Synchronous key/value backend
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Reads and writes the level record under one key
#[derive(Debug, Clone)]
pub struct LevelStore<S> {
    backend: S,
    key: String,
}

impl<S: Storage> LevelStore<S> {
    pub fn new(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    /// Load the record; `Ok(None)` when nothing was saved yet
    pub fn load(&self) -> Result<Option<LevelProgress>> {
        let Some(json) = self.backend.get(&self.key)? else {
            return Ok(None);
        };
        let progress: LevelProgress = serde_json::from_str(&json)?;
        if progress.level == 0 {
            return Err(BlockDropError::InvalidLevel(progress.level));
        }
        Ok(Some(progress))
    }

    /// Current level, 1 when absent or unreadable
    pub fn read_level(&self) -> u32 {
        match self.load() {
            Ok(Some(progress)) => progress.level,
            Ok(None) => {
                log::info!("No save under '{}', starting at level 1", self.key);
                LevelProgress::default().level
            }
            Err(e) => {
                log::warn!("Discarding save under '{}': {}", self.key, e);
                LevelProgress::default().level
            }
        }
    }

    pub fn write_level(&mut self, level: u32) -> Result<()> {
        if level == 0 {
            return Err(BlockDropError::InvalidLevel(level));
        }
        let json = serde_json::to_string(&LevelProgress { level })?;
        self.backend.set(&self.key, &json)?;
        log::info!("Saved level {}", level);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(json: Option<&str>) -> LevelStore<MemoryStorage> {
        let mut backend = MemoryStorage::new();
        if let Some(json) = json {
            backend.set("block-drop", json).unwrap();
        }
        LevelStore::new(backend, "block-drop")
    }

    #[test]
    fn test_absent_record_is_level_one() {
        let store = store_with(None);
        assert!(store.load().unwrap().is_none());
        assert_eq!(store.read_level(), 1);
    }

    #[test]
    fn test_reads_saved_level() {
        let store = store_with(Some(r#"{"level":7}"#));
        assert_eq!(store.read_level(), 7);
    }

    #[test]
    fn test_malformed_record_fails_closed() {
        for json in [
            "garbage",
            r#"{"level":-3}"#,
            r#"{"level":"two"}"#,
            r#"{}"#,
            r#"{"level":0}"#,
        ] {
            let store = store_with(Some(json));
            assert!(store.load().is_err(), "{} should not load", json);
            assert_eq!(store.read_level(), 1, "{} should fail closed", json);
        }
    }

    #[test]
    fn test_write_uses_level_record_shape() {
        let mut store = store_with(None);
        store.write_level(4).unwrap();
        assert_eq!(
            store.backend().get("block-drop").unwrap().as_deref(),
            Some(r#"{"level":4}"#)
        );
        assert_eq!(store.read_level(), 4);

        // Last write wins
        store.write_level(5).unwrap();
        assert_eq!(store.read_level(), 5);
    }

    #[test]
    fn test_write_rejects_level_zero() {
        let mut store = store_with(None);
        assert!(matches!(
            store.write_level(0),
            Err(BlockDropError::InvalidLevel(0))
        ));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_backend_failure_fails_closed() {
        let mut backend = MemoryStorage::new();
        backend.set("block-drop", r#"{"level":9}"#).unwrap();
        backend.set_unavailable(true);
        let mut store = LevelStore::new(backend, "block-drop");

        assert_eq!(store.read_level(), 1);
        assert!(matches!(
            store.write_level(10),
            Err(BlockDropError::StorageUnavailable)
        ));
    }
}
