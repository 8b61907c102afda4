//! Local persistence with pluggable backends.
//!
//! Provides the flat key-value layer that all local state lives in, plus the
//! [`LocalStore`] contract built on top of it. Supports two backends:
//!
//! - **RedbBackend**: persistent storage with ACID guarantees (default for CLI)
//! - **MemoryBackend**: fast, non-persistent storage (ideal for testing/embedding)
//!
//! Every piece of durable state is one flat string key holding JSON or plain
//! text: the collection snapshot, the backup list, the obfuscated token, and
//! the last-sync markers.
//!
//! # Example
//!
//! ```ignore
//! use lifelog::store::{KvStore, LocalStore};
//!
//! // In-memory (testing/embedding)
//! let store = LocalStore::new(KvStore::memory());
//!
//! // Persistent (production)
//! let store = LocalStore::new(KvStore::file("~/.lifelog/store.redb")?);
//! store.save(&entries);
//! ```

mod backend;
mod kv;
mod local;
mod memory;
mod redb;

#[cfg(test)]
mod tests;

pub use backend::StoreBackend;
pub use kv::KvStore;
pub use local::{Backup, LocalStore, PersistedSnapshot};
pub use memory::MemoryBackend;
pub use redb::RedbBackend;
