//! Backend trait for the local key-value store.
//!
//! Defines the interface that all storage backends must implement,
//! enabling pluggable storage (redb, memory, etc.).

use anyhow::Result;

/// Backend trait for flat key-value storage.
///
/// Values are UTF-8 strings: JSON documents for structured state, plain
/// text for markers. Access is synchronous; within one process the store
/// is the only shared mutable resource and calls are inherently serialized.
///
/// # Example
///
/// ```ignore
/// use lifelog::store::{MemoryBackend, StoreBackend};
///
/// let backend = MemoryBackend::new();
/// backend.set("key", "value")?;
/// let value = backend.get("key")?;
/// ```
pub trait StoreBackend: Send + Sync + 'static {
    /// Retrieves a value by key.
    ///
    /// Returns `Ok(None)` if the key doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores a key-value pair, overwriting any existing value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails
    /// (e.g., disk full).
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes a key-value pair.
    ///
    /// Returns `Ok(true)` if the key existed and was removed,
    /// `Ok(false)` if it didn't exist. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    fn delete(&self, key: &str) -> Result<bool>;

    /// Checks if a key exists.
    ///
    /// Default implementation uses `get()`, but backends may override
    /// for efficiency.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}
