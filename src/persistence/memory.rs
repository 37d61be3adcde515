//! In-memory storage backend for native builds and tests

use std::collections::HashMap;

use super::Storage;
use crate::error::{BlockDropError, Result};

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    unavailable: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a backend that refuses every operation
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.unavailable {
            return Err(BlockDropError::StorageUnavailable);
        }
        Ok(self.items.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.unavailable {
            return Err(BlockDropError::StorageUnavailable);
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
