//! The editing session orchestrator.
//!
//! [`EditorSession`] owns the in-memory collection and coordinates the
//! local store, the sync client, and the auto-save coordinator. Every
//! mutation re-sorts the collection by date descending and attempts an
//! immediate local save before reporting success; new ids come from the
//! current in-memory collection at assignment time. Sync is serialized
//! through a state gate: a request while one is in flight is dropped, not
//! deferred.

mod autosave;

pub use autosave::{AutosaveHandle, AutosaveStatus};

use crate::constants::AUTO_SAVE_INTERVAL;
use crate::error::{Error, Result};
use crate::model::{self, TimelineEntry};
use crate::store::LocalStore;
use crate::sync::{ConflictCheck, RemoteWrite, SyncClient};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Sync state machine; the sole gate against concurrent sync requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    #[default]
    Idle,
    Syncing,
    Success,
    Error,
}

/// Outcome of a sync request.
#[derive(Debug)]
pub enum SyncOutcome {
    /// Committed; the new write acknowledgement.
    Completed(RemoteWrite),
    /// A conflict was detected and the caller did not force; nothing was
    /// written.
    Conflict(ConflictCheck),
    /// Another sync was already in flight; this request was dropped.
    AlreadySyncing,
}

/// Fields of a record under creation; the id is assigned by the session.
#[derive(Debug, Clone, Default)]
pub struct NewEntry {
    pub date: String,
    pub title: String,
    pub description: String,
    pub kind: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
}

/// Partial update of an existing record; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct EntryUpdate {
    pub date: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}

/// UI-facing orchestrator of one editing session.
pub struct EditorSession {
    entries: Arc<RwLock<Vec<TimelineEntry>>>,
    store: LocalStore,
    sync: SyncClient,
    autosave: Option<AutosaveHandle>,
    sync_state: SyncState,
}

impl EditorSession {
    /// Open a session: load the persisted collection and start auto-save.
    pub fn open(store: LocalStore, sync: SyncClient) -> Self {
        Self::open_with_autosave_interval(store, sync, AUTO_SAVE_INTERVAL)
    }

    /// Open with a custom auto-save interval (tests).
    pub fn open_with_autosave_interval(
        store: LocalStore,
        sync: SyncClient,
        interval: Duration,
    ) -> Self {
        let mut loaded = store.load().unwrap_or_default();
        model::sort_by_date_desc(&mut loaded);
        let entries = Arc::new(RwLock::new(loaded));
        let autosave = AutosaveHandle::start(entries.clone(), store.clone(), interval);

        Self {
            entries,
            store,
            sync,
            autosave: Some(autosave),
            sync_state: SyncState::default(),
        }
    }

    /// Snapshot of the in-memory collection.
    pub fn entries(&self) -> Vec<TimelineEntry> {
        self.entries.read().clone()
    }

    pub fn sync_client(&self) -> &SyncClient {
        &self.sync
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    /// Auto-save progress markers for UI feedback.
    pub fn autosave_status(&self) -> Option<AutosaveStatus> {
        self.autosave.as_ref().map(AutosaveHandle::status)
    }

    /// Add a new record; returns its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRecord`] when title or description is empty
    /// after trimming.
    pub fn add(&mut self, new: NewEntry) -> Result<u64> {
        validate_text_fields(&new.title, &new.description)?;

        let mut entries = self.entries.write();
        let id = model::next_id(&entries);

        let mut entry = TimelineEntry {
            date: new.date,
            title: new.title.trim().to_string(),
            description: new.description.trim().to_string(),
            kind: new.kind,
            tags: Vec::new(),
            images: new.images,
            id,
        };
        for tag in new.tags {
            entry.push_tag(tag);
        }

        entries.push(entry);
        model::sort_by_date_desc(&mut entries);
        drop(entries);

        self.persist();
        Ok(id)
    }

    /// Apply a partial update to an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] for an unknown id, or
    /// [`Error::InvalidRecord`] when the update empties a required field.
    pub fn update(&mut self, id: u64, update: EntryUpdate) -> Result<()> {
        let mut entries = self.entries.write();
        let entry = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(Error::RecordNotFound { id })?;

        if let Some(date) = update.date {
            entry.date = date;
        }
        if let Some(title) = update.title {
            entry.title = title.trim().to_string();
        }
        if let Some(description) = update.description {
            entry.description = description.trim().to_string();
        }
        if let Some(kind) = update.kind {
            entry.kind = kind;
        }
        if let Some(tags) = update.tags {
            entry.tags = Vec::new();
            for tag in tags {
                entry.push_tag(tag);
            }
        }
        if let Some(images) = update.images {
            entry.images = images;
        }

        validate_text_fields(&entry.title, &entry.description)?;

        model::sort_by_date_desc(&mut entries);
        drop(entries);

        self.persist();
        Ok(())
    }

    /// Delete a record. Confirmation is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] for an unknown id.
    pub fn remove(&mut self, id: u64) -> Result<()> {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Err(Error::RecordNotFound { id });
        }
        drop(entries);

        self.persist();
        Ok(())
    }

    /// Import a collection from a JSON file, replacing the current one.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::ImportFormat`] and IO errors; existing data is
    /// untouched on failure.
    pub fn import(&mut self, path: &Path) -> Result<usize> {
        let mut imported = self.store.import_data(path)?;
        model::sort_by_date_desc(&mut imported);
        let count = imported.len();
        *self.entries.write() = imported;
        self.persist();
        Ok(count)
    }

    /// Export the persisted collection to a dated file in `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoDataToExport`] when nothing is persisted.
    pub fn export(&self, dir: &Path) -> Result<PathBuf> {
        self.store.export_data(dir)
    }

    /// Sync the collection to the remote store.
    ///
    /// No-op when a sync is already in flight. Unless `force` is set, an
    /// advisory conflict check runs first and a detected conflict aborts
    /// the request without writing.
    ///
    /// # Errors
    ///
    /// Propagates commit failures (auth, transport, rejected write); the
    /// state gate returns to idle and local data is left untouched.
    pub fn sync(&mut self, force: bool, message: Option<&str>) -> Result<SyncOutcome> {
        if self.sync_state == SyncState::Syncing {
            return Ok(SyncOutcome::AlreadySyncing);
        }
        self.sync_state = SyncState::Syncing;

        if !force {
            let check = self.sync.detect_conflict();
            if check.has_conflict {
                self.sync_state = SyncState::Idle;
                return Ok(SyncOutcome::Conflict(check));
            }
        }

        let snapshot = self.entries();
        match self.sync.commit(&snapshot, message) {
            Ok(write) => {
                self.sync_state = SyncState::Success;
                Ok(SyncOutcome::Completed(write))
            }
            Err(err) => {
                self.sync_state = SyncState::Error;
                Err(err)
            }
        }
    }

    /// Current position of the sync state machine.
    pub fn sync_state(&self) -> SyncState {
        self.sync_state
    }

    /// Persist the in-memory collection immediately.
    pub fn save_now(&self) -> bool {
        self.store.save(&self.entries())
    }

    /// End the session: stop auto-save after one final save.
    pub fn close(mut self) {
        if let Some(autosave) = self.autosave.take() {
            autosave.stop();
        }
    }

    fn persist(&self) {
        if !self.store.save(&self.entries.read()) {
            warn!("local save failed after mutation");
        }
    }

    #[cfg(test)]
    fn set_sync_state(&mut self, state: SyncState) {
        self.sync_state = state;
    }
}

fn validate_text_fields(title: &str, description: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::InvalidRecord("title must not be empty".to_string()));
    }
    if description.trim().is_empty() {
        return Err(Error::InvalidRecord(
            "description must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests;
