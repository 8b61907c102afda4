//! In-memory storage backend.
//!
//! Provides a fast, non-persistent key-value store. Ideal for testing,
//! development, and embedded use cases.

use super::backend::StoreBackend;
use anyhow::Result;
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory key-value storage backend.
///
/// All data is lost when the process exits. Ideal for:
/// - Testing and development
/// - Temporary scratch sessions
///
/// # Thread Safety
///
/// Uses a `parking_lot::RwLock` internally; safe to share behind an `Arc`.
#[derive(Default)]
pub struct MemoryBackend {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Creates a new empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries in the store.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl StoreBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.data.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.data.write().remove(key).is_some())
    }
}
