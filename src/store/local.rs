//! The local persistence contract for the timeline collection.
//!
//! [`LocalStore`] wraps a [`KvStore`] and implements the editing session's
//! durability guarantees: snapshot save/load with timestamps, a bounded ring
//! of backups, import/export to flat JSON files, and the unsynced-changes
//! check. Save/load/backup operations never propagate storage failures to
//! the caller; they log the cause and degrade to `bool`/`Option`/empty
//! returns so UI-facing code can keep running.

use super::kv::KvStore;
use crate::constants::{
    AUTH_FLAG_KEY, BACKUP_KEY, LAST_SYNC_TIME_KEY, MAX_BACKUPS, SNAPSHOT_VERSION, STORAGE_KEY,
};
use crate::error::{Error, Result};
use crate::model::TimelineEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// The persisted wrapper around the collection.
///
/// Distinguishes "has the user saved since last sync" from raw presence of
/// data via the `lastSaved` timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    pub data: Vec<TimelineEntry>,
    #[serde(rename = "lastSaved")]
    pub last_saved: DateTime<Utc>,
    pub version: String,
}

/// One retained backup snapshot, newest first in the stored list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backup {
    /// Creation time in epoch milliseconds; doubles as the lookup id.
    pub id: u64,
    pub data: Vec<TimelineEntry>,
    pub timestamp: DateTime<Utc>,
}

/// Local persistence store for the timeline collection.
#[derive(Clone)]
pub struct LocalStore {
    kv: KvStore,
}

impl LocalStore {
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    /// Access to the underlying key-value store.
    pub fn kv(&self) -> &KvStore {
        &self.kv
    }

    /// Persist the collection as the primary snapshot.
    ///
    /// On success a backup is also created. Returns `false` on any storage
    /// failure; never panics or propagates the error.
    pub fn save(&self, entries: &[TimelineEntry]) -> bool {
        let snapshot = PersistedSnapshot {
            data: entries.to_vec(),
            last_saved: Utc::now(),
            version: SNAPSHOT_VERSION.to_string(),
        };

        let json = match serde_json::to_string(&snapshot) {
            Ok(json) => json,
            Err(err) => {
                error!("failed to serialize snapshot: {err}");
                return false;
            }
        };

        if let Err(err) = self.kv.set(STORAGE_KEY, &json) {
            error!("failed to save to local store: {err}");
            return false;
        }

        self.create_backup(entries);
        debug!(entries = entries.len(), "saved collection");
        true
    }

    /// Load the persisted collection.
    ///
    /// Returns `None` if nothing is stored or the stored value fails to
    /// parse.
    pub fn load(&self) -> Option<Vec<TimelineEntry>> {
        let stored = match self.kv.get(STORAGE_KEY) {
            Ok(stored) => stored?,
            Err(err) => {
                error!("failed to load from local store: {err}");
                return None;
            }
        };

        match serde_json::from_str::<PersistedSnapshot>(&stored) {
            Ok(snapshot) => Some(snapshot.data),
            Err(err) => {
                warn!("stored snapshot failed to parse: {err}");
                None
            }
        }
    }

    /// Timestamp of the last successful save, if any.
    pub fn last_save_time(&self) -> Option<DateTime<Utc>> {
        let stored = self.kv.get(STORAGE_KEY).ok()??;
        let snapshot: PersistedSnapshot = serde_json::from_str(&stored).ok()?;
        Some(snapshot.last_saved)
    }

    /// Prepend a new backup and trim the list to the most recent
    /// [`MAX_BACKUPS`]. Best-effort: failures are logged and swallowed.
    pub fn create_backup(&self, entries: &[TimelineEntry]) {
        let mut backups = self.backups();
        backups.insert(
            0,
            Backup {
                id: Utc::now().timestamp_millis() as u64,
                data: entries.to_vec(),
                timestamp: Utc::now(),
            },
        );
        backups.truncate(MAX_BACKUPS);

        match serde_json::to_string(&backups) {
            Ok(json) => {
                if let Err(err) = self.kv.set(BACKUP_KEY, &json) {
                    error!("failed to write backup list: {err}");
                }
            }
            Err(err) => error!("failed to serialize backup list: {err}"),
        }
    }

    /// All retained backups, newest first. Empty on any failure.
    pub fn backups(&self) -> Vec<Backup> {
        let stored = match self.kv.get(BACKUP_KEY) {
            Ok(Some(stored)) => stored,
            Ok(None) => return Vec::new(),
            Err(err) => {
                error!("failed to read backup list: {err}");
                return Vec::new();
            }
        };

        serde_json::from_str(&stored).unwrap_or_default()
    }

    /// Restore a backup by id.
    ///
    /// If found, the backup becomes the new primary snapshot (triggering a
    /// fresh save/backup cycle) and its data is returned. If not found,
    /// returns `None` without side effects.
    pub fn restore_backup(&self, id: u64) -> Option<Vec<TimelineEntry>> {
        let backups = self.backups();
        let backup = backups.into_iter().find(|b| b.id == id)?;
        self.save(&backup.data);
        Some(backup.data)
    }

    /// Remove both the primary snapshot and the backup list unconditionally.
    pub fn clear(&self) {
        if let Err(err) = self.kv.delete(STORAGE_KEY) {
            error!("failed to clear primary snapshot: {err}");
        }
        if let Err(err) = self.kv.delete(BACKUP_KEY) {
            error!("failed to clear backups: {err}");
        }
    }

    /// Export the currently *persisted* collection to a dated JSON file in
    /// `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoDataToExport`] if nothing is persisted, or an IO
    /// error if the file cannot be written.
    pub fn export_data(&self, dir: &Path) -> Result<PathBuf> {
        let entries = self.load().ok_or(Error::NoDataToExport)?;

        let file_name = format!("timeline-data-{}.json", Utc::now().format("%Y-%m-%d"));
        let path = dir.join(file_name);

        let json = serde_json::to_string_pretty(&entries)?;
        fs::write(&path, json)
            .map_err(|err| Error::io(format!("writing export file {}", path.display()), err))?;

        Ok(path)
    }

    /// Import a collection from a JSON file.
    ///
    /// The top-level value must be an array and every element must carry a
    /// positive `id`, a non-empty `date`, and a non-empty `title`. On
    /// success the imported collection is persisted before being returned;
    /// on failure existing persisted data is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ImportFormat`] for malformed input, or an IO error
    /// if the file cannot be read.
    pub fn import_data(&self, path: &Path) -> Result<Vec<TimelineEntry>> {
        let content = fs::read_to_string(path)
            .map_err(|err| Error::io(format!("reading import file {}", path.display()), err))?;

        let value: serde_json::Value = serde_json::from_str(&content)
            .map_err(|err| Error::ImportFormat(format!("invalid JSON: {err}")))?;

        let items = value
            .as_array()
            .ok_or_else(|| Error::ImportFormat("top-level value must be an array".to_string()))?;

        for item in items {
            if !has_required_fields(item) {
                return Err(Error::ImportFormat(
                    "every record needs a positive id, a date, and a title".to_string(),
                ));
            }
        }

        let entries: Vec<TimelineEntry> = serde_json::from_value(value)
            .map_err(|err| Error::ImportFormat(format!("records failed to parse: {err}")))?;

        self.save(&entries);
        Ok(entries)
    }

    /// True iff the last local save is strictly newer than the last
    /// successful sync. False when either marker is missing.
    pub fn has_unsynced_changes(&self) -> bool {
        let Some(last_save) = self.last_save_time() else {
            return false;
        };
        let Ok(Some(last_sync)) = self.kv.get(LAST_SYNC_TIME_KEY) else {
            return false;
        };
        let Ok(last_sync) = last_sync.parse::<DateTime<Utc>>() else {
            return false;
        };
        last_save > last_sync
    }

    /// Set the session "authenticated" flag.
    pub fn set_authenticated(&self, authenticated: bool) {
        let value = if authenticated { "true" } else { "false" };
        if let Err(err) = self.kv.set(AUTH_FLAG_KEY, value) {
            error!("failed to write authenticated flag: {err}");
        }
    }

    /// Read the session "authenticated" flag.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.kv.get(AUTH_FLAG_KEY), Ok(Some(v)) if v == "true")
    }
}

/// Mirror of the original import validation: `id` must be a positive
/// integer, `date` and `title` non-empty strings.
fn has_required_fields(item: &serde_json::Value) -> bool {
    let id_ok = item
        .get("id")
        .and_then(serde_json::Value::as_u64)
        .is_some_and(|id| id > 0);
    let date_ok = item
        .get("date")
        .and_then(serde_json::Value::as_str)
        .is_some_and(|s| !s.is_empty());
    let title_ok = item
        .get("title")
        .and_then(serde_json::Value::as_str)
        .is_some_and(|s| !s.is_empty());
    id_ok && date_ok && title_ok
}
