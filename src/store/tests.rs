//! Tests for the local persistence store.

use super::*;
use crate::constants::{LAST_SYNC_TIME_KEY, MAX_BACKUPS};
use crate::error::Error;
use crate::model::TimelineEntry;
use chrono::Utc;
use proptest::prelude::*;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn entry(id: u64, date: &str, title: &str) -> TimelineEntry {
    TimelineEntry {
        date: date.to_string(),
        title: title.to_string(),
        description: "description".to_string(),
        kind: "daily".to_string(),
        tags: vec!["tag".to_string()],
        images: vec![],
        id,
    }
}

fn memory_store() -> LocalStore {
    LocalStore::new(KvStore::memory())
}

#[test]
fn test_save_and_load_round_trip() {
    let store = memory_store();
    let entries = vec![entry(1, "2024-01-01", "a"), entry(2, "2024-02-01", "b")];

    assert!(store.save(&entries));
    assert_eq!(store.load().unwrap(), entries);
}

#[test]
fn test_save_and_load_round_trip_redb() {
    let tmp = TempDir::new().unwrap();
    let store = LocalStore::new(KvStore::file(tmp.path().join("store.redb")).unwrap());
    let entries = vec![entry(1, "2024-01-01", "a")];

    assert!(store.save(&entries));
    assert_eq!(store.load().unwrap(), entries);
}

#[test]
fn test_load_empty_store() {
    assert!(memory_store().load().is_none());
}

#[test]
fn test_last_save_time() {
    let store = memory_store();
    assert!(store.last_save_time().is_none());

    let before = Utc::now();
    store.save(&[entry(1, "2024-01-01", "a")]);
    let saved = store.last_save_time().unwrap();
    assert!(saved >= before);
    assert!(saved <= Utc::now());
}

#[test]
fn test_backup_cap_and_ordering() {
    let store = memory_store();

    for i in 0..6u64 {
        store.create_backup(&[entry(i + 1, "2024-01-01", &format!("v{i}"))]);
        // Backup ids are epoch millis; keep them distinct.
        thread::sleep(Duration::from_millis(2));
    }

    let backups = store.backups();
    assert_eq!(backups.len(), MAX_BACKUPS);
    // Newest first: the last created backup (v5) leads, the oldest (v0)
    // was evicted.
    assert_eq!(backups[0].data[0].title, "v5");
    assert_eq!(backups[4].data[0].title, "v1");
    assert!(backups.windows(2).all(|w| w[0].id >= w[1].id));
}

#[test]
fn test_restore_backup() {
    let store = memory_store();
    store.save(&[entry(1, "2024-01-01", "first")]);
    thread::sleep(Duration::from_millis(2));
    store.save(&[entry(1, "2024-01-01", "first"), entry(2, "2024-02-01", "second")]);

    let backups = store.backups();
    let old = backups.last().unwrap();
    assert_eq!(old.data.len(), 1);

    let restored = store.restore_backup(old.id).unwrap();
    assert_eq!(restored.len(), 1);
    // Restoring persists the backup as the new primary snapshot.
    assert_eq!(store.load().unwrap(), restored);
}

#[test]
fn test_restore_missing_backup_has_no_side_effects() {
    let store = memory_store();
    store.save(&[entry(1, "2024-01-01", "keep")]);

    assert!(store.restore_backup(42).is_none());
    assert_eq!(store.load().unwrap()[0].title, "keep");
}

#[test]
fn test_clear_removes_primary_and_backups() {
    let store = memory_store();
    store.save(&[entry(1, "2024-01-01", "a")]);
    assert!(!store.backups().is_empty());

    store.clear();
    assert!(store.load().is_none());
    assert!(store.backups().is_empty());
}

#[test]
fn test_export_without_data_fails() {
    let tmp = TempDir::new().unwrap();
    let result = memory_store().export_data(tmp.path());
    assert!(matches!(result, Err(Error::NoDataToExport)));
    // No file was produced.
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[test]
fn test_export_writes_dated_file() {
    let tmp = TempDir::new().unwrap();
    let store = memory_store();
    let entries = vec![entry(1, "2024-01-01", "a")];
    store.save(&entries);

    let path = store.export_data(tmp.path()).unwrap();
    let expected = format!("timeline-data-{}.json", Utc::now().format("%Y-%m-%d"));
    assert_eq!(path.file_name().unwrap().to_str().unwrap(), expected);

    let exported: Vec<TimelineEntry> =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(exported, entries);
}

#[test]
fn test_import_round_trip() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("import.json");
    let entries = vec![entry(1, "2024-01-01", "a"), entry(2, "2024-02-01", "b")];
    std::fs::write(&path, serde_json::to_string_pretty(&entries).unwrap()).unwrap();

    let store = memory_store();
    let imported = store.import_data(&path).unwrap();
    assert_eq!(imported, entries);
    // Import persists as a side effect.
    assert_eq!(store.load().unwrap(), entries);
}

#[test]
fn test_import_missing_title_leaves_store_untouched() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("import.json");
    std::fs::write(
        &path,
        r#"[{"id": 1, "date": "2024-01-01", "title": "ok", "description": ""},
           {"id": 2, "date": "2024-02-01", "description": "no title"}]"#,
    )
    .unwrap();

    let store = memory_store();
    store.save(&[entry(9, "2023-01-01", "existing")]);

    let result = store.import_data(&path);
    assert!(matches!(result, Err(Error::ImportFormat(_))));
    assert_eq!(store.load().unwrap()[0].title, "existing");
}

#[test]
fn test_import_rejects_non_array() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("import.json");
    std::fs::write(&path, r#"{"id": 1}"#).unwrap();

    let result = memory_store().import_data(&path);
    assert!(matches!(result, Err(Error::ImportFormat(_))));
}

#[test]
fn test_import_rejects_zero_id() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("import.json");
    std::fs::write(
        &path,
        r#"[{"id": 0, "date": "2024-01-01", "title": "t", "description": ""}]"#,
    )
    .unwrap();

    let result = memory_store().import_data(&path);
    assert!(matches!(result, Err(Error::ImportFormat(_))));
}

#[test]
fn test_has_unsynced_changes() {
    let store = memory_store();
    // No save and no sync marker: nothing to report.
    assert!(!store.has_unsynced_changes());

    store.save(&[entry(1, "2024-01-01", "a")]);
    // Saved but never synced: still false, there is no sync marker yet.
    assert!(!store.has_unsynced_changes());

    let past = (Utc::now() - chrono::Duration::hours(1)).to_rfc3339();
    store.kv().set(LAST_SYNC_TIME_KEY, &past).unwrap();
    assert!(store.has_unsynced_changes());

    let future = (Utc::now() + chrono::Duration::hours(1)).to_rfc3339();
    store.kv().set(LAST_SYNC_TIME_KEY, &future).unwrap();
    assert!(!store.has_unsynced_changes());
}

#[test]
fn test_authenticated_flag() {
    let store = memory_store();
    assert!(!store.is_authenticated());
    store.set_authenticated(true);
    assert!(store.is_authenticated());
    store.set_authenticated(false);
    assert!(!store.is_authenticated());
}

proptest! {
    #[test]
    fn prop_save_load_round_trip(
        titles in proptest::collection::vec("[a-zA-Z0-9 ]{1,20}", 0..8)
    ) {
        let store = memory_store();
        let entries: Vec<TimelineEntry> = titles
            .iter()
            .enumerate()
            .map(|(i, t)| entry(i as u64 + 1, "2024-01-01", t))
            .collect();

        prop_assert!(store.save(&entries));
        prop_assert_eq!(store.load().unwrap(), entries);
    }
}
