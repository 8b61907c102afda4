//! Redb-backed storage backend.
//!
//! Provides persistent key-value storage using redb with ACID guarantees.

use super::backend::StoreBackend;
use anyhow::{Context, Result};
use redb::{Database, ReadableDatabase, TableDefinition};
use std::path::Path;
use std::sync::Arc;

/// Table name for the flat key-value state
pub(crate) const STATE_TABLE: TableDefinition<'static, &'static str, &'static str> =
    TableDefinition::new("state");

/// Redb-backed key-value storage backend.
///
/// Provides persistent storage with ACID guarantees. Suitable for
/// production use where durability is required.
///
/// # Thread Safety
///
/// `RedbBackend` is `Clone` and can be shared across threads. The underlying
/// database handles concurrent access safely.
#[derive(Clone)]
pub struct RedbBackend {
    db: Arc<Database>,
}

impl RedbBackend {
    /// Opens or creates a redb database at the given path.
    ///
    /// Creates parent directories if needed. Uses redb's ACID guarantees
    /// to prevent corruption on crashes or unclean shutdowns.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory cannot be created
    /// - Database file cannot be opened or created (permissions, disk full, etc.)
    /// - Initialization transaction fails to begin or commit
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists before opening database
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create store directory: {}", parent.display())
            })?;
        }

        let db = Database::create(path)
            .with_context(|| format!("Failed to open store database: {}", path.display()))?;

        // Initialize table on first open to ensure it exists for reads
        let write_txn = db
            .begin_write()
            .context("Failed to begin initialization transaction")?;
        {
            let _table = write_txn
                .open_table(STATE_TABLE)
                .context("Failed to initialize state table")?;
        }
        write_txn
            .commit()
            .context("Failed to commit initialization transaction")?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl StoreBackend for RedbBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;

        let table = read_txn
            .open_table(STATE_TABLE)
            .context("Failed to open state table")?;

        let result = table
            .get(key)
            .with_context(|| format!("Failed to read key '{key}'"))?;

        Ok(result.map(|guard| guard.value().to_string()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        {
            let mut table = write_txn
                .open_table(STATE_TABLE)
                .context("Failed to open state table")?;
            table
                .insert(key, value)
                .with_context(|| format!("Failed to write key '{key}'"))?;
        }
        write_txn
            .commit()
            .context("Failed to commit write transaction")?;

        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        let existed;
        {
            let mut table = write_txn
                .open_table(STATE_TABLE)
                .context("Failed to open state table")?;
            existed = table
                .remove(key)
                .with_context(|| format!("Failed to remove key '{key}'"))?
                .is_some();
        }
        write_txn
            .commit()
            .context("Failed to commit delete transaction")?;

        Ok(existed)
    }
}
