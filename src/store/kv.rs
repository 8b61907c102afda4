//! High-level `KvStore` wrapper over backend implementations.
//!
//! Provides a convenient API that wraps any `StoreBackend` implementation.

use super::backend::StoreBackend;
use super::memory::MemoryBackend;
use super::redb::RedbBackend;
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

/// High-level key-value store interface.
///
/// Wraps a `StoreBackend` implementation and provides a consistent API
/// regardless of the underlying storage mechanism.
///
/// # Thread Safety
///
/// `KvStore` is `Clone` and can be shared across threads. The underlying
/// backend handles concurrent access safely.
///
/// # Example
///
/// ```ignore
/// use lifelog::store::KvStore;
///
/// let store = KvStore::memory();
/// store.set("sync.last_sha", "abc123")?;
/// if let Some(sha) = store.get("sync.last_sha")? {
///     println!("last sync: {sha}");
/// }
/// ```
#[derive(Clone)]
pub struct KvStore {
    backend: Arc<dyn StoreBackend>,
}

impl KvStore {
    /// Creates a new `KvStore` backed by a file-based redb database.
    ///
    /// This is the default for CLI usage where persistence is required.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let backend = RedbBackend::open(path)?;
        Ok(Self {
            backend: Arc::new(backend),
        })
    }

    /// Creates a new `KvStore` backed by an in-memory store.
    ///
    /// Ideal for testing, development, and embedded applications.
    /// All data is lost when the process exits.
    pub fn memory() -> Self {
        Self {
            backend: Arc::new(MemoryBackend::new()),
        }
    }

    /// Creates a new `KvStore` with a custom backend.
    pub fn custom(backend: impl StoreBackend) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Retrieves a value by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend operation fails.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.backend.get(key)
    }

    /// Stores a key-value pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend operation fails.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.backend.set(key, value)
    }

    /// Deletes a key; returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend operation fails.
    pub fn delete(&self, key: &str) -> Result<bool> {
        self.backend.delete(key)
    }

    /// Checks if a key exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend operation fails.
    pub fn exists(&self, key: &str) -> Result<bool> {
        self.backend.exists(key)
    }
}
