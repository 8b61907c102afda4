//! Tests for the editing session orchestrator.

use super::*;
use crate::config::GithubConfig;
use crate::model::TimelineEntry;
use crate::store::KvStore;
use crate::sync::{MemoryGithubApi, generate_file_content, parse_embedded_data};

fn entry(id: u64, date: &str) -> TimelineEntry {
    TimelineEntry {
        date: date.to_string(),
        title: format!("entry {id}"),
        description: "text".to_string(),
        kind: "daily".to_string(),
        tags: vec![],
        images: vec![],
        id,
    }
}

struct Fixture {
    api: Arc<MemoryGithubApi>,
    session: EditorSession,
    store: LocalStore,
}

fn fixture(seed: &[TimelineEntry]) -> Fixture {
    let kv = KvStore::memory();
    let store = LocalStore::new(kv.clone());
    if !seed.is_empty() {
        assert!(store.save(seed));
    }

    let api = Arc::new(MemoryGithubApi::new());
    api.seed_file(
        "src/data/timelineData.js",
        generate_file_content(seed).as_bytes(),
    );

    let sync = SyncClient::new(api.clone(), GithubConfig::default(), kv);
    sync.tokens().save("test-token");

    // A long interval keeps the auto-save thread quiet during tests;
    // explicit persistence paths are what is under test here.
    let session =
        EditorSession::open_with_autosave_interval(store.clone(), sync, Duration::from_secs(3600));

    Fixture {
        api,
        session,
        store,
    }
}

#[test]
fn test_add_assigns_next_id_and_sorts() {
    let mut f = fixture(&[entry(1, "2024-01-01")]);

    let id = f
        .session
        .add(NewEntry {
            date: "2024-03-01".to_string(),
            title: "T".to_string(),
            description: "D".to_string(),
            kind: "daily".to_string(),
            tags: vec![],
            images: vec![],
        })
        .unwrap();
    assert_eq!(id, 2);

    let entries = f.session.entries();
    assert_eq!(entries.len(), 2);
    // Newest date first.
    assert_eq!(entries[0].id, 2);
    assert_eq!(entries[0].date, "2024-03-01");
    assert_eq!(entries[1].id, 1);

    // The mutation was persisted before returning.
    assert_eq!(f.store.load().unwrap().len(), 2);
}

#[test]
fn test_add_rejects_blank_fields() {
    let mut f = fixture(&[]);

    let result = f.session.add(NewEntry {
        date: "2024-01-01".to_string(),
        title: "   ".to_string(),
        description: "D".to_string(),
        ..NewEntry::default()
    });
    assert!(matches!(result, Err(Error::InvalidRecord(_))));

    let result = f.session.add(NewEntry {
        date: "2024-01-01".to_string(),
        title: "T".to_string(),
        description: "".to_string(),
        ..NewEntry::default()
    });
    assert!(matches!(result, Err(Error::InvalidRecord(_))));
    assert!(f.session.entries().is_empty());
}

#[test]
fn test_add_dedupes_tags() {
    let mut f = fixture(&[]);
    f.session
        .add(NewEntry {
            date: "2024-01-01".to_string(),
            title: "T".to_string(),
            description: "D".to_string(),
            tags: vec!["a".to_string(), "b".to_string(), "a".to_string()],
            ..NewEntry::default()
        })
        .unwrap();

    assert_eq!(f.session.entries()[0].tags, vec!["a", "b"]);
}

#[test]
fn test_ids_never_reused_after_delete() {
    let mut f = fixture(&[entry(1, "2024-01-01"), entry(2, "2024-02-01")]);
    f.session.remove(2).unwrap();

    let id = f
        .session
        .add(NewEntry {
            date: "2024-04-01".to_string(),
            title: "T".to_string(),
            description: "D".to_string(),
            ..NewEntry::default()
        })
        .unwrap();
    // max(existing) + 1 over the current collection.
    assert_eq!(id, 2);
    assert!(crate::model::ids_unique(&f.session.entries()));
}

#[test]
fn test_update_resorts_and_persists() {
    let mut f = fixture(&[entry(1, "2024-01-01"), entry(2, "2024-02-01")]);

    f.session
        .update(
            1,
            EntryUpdate {
                date: Some("2024-12-31".to_string()),
                ..EntryUpdate::default()
            },
        )
        .unwrap();

    let entries = f.session.entries();
    assert_eq!(entries[0].id, 1);
    assert_eq!(f.store.load().unwrap()[0].id, 1);
}

#[test]
fn test_update_unknown_id() {
    let mut f = fixture(&[entry(1, "2024-01-01")]);
    let result = f.session.update(99, EntryUpdate::default());
    assert!(matches!(result, Err(Error::RecordNotFound { id: 99 })));
}

#[test]
fn test_update_cannot_blank_title() {
    let mut f = fixture(&[entry(1, "2024-01-01")]);
    let result = f.session.update(
        1,
        EntryUpdate {
            title: Some("  ".to_string()),
            ..EntryUpdate::default()
        },
    );
    assert!(matches!(result, Err(Error::InvalidRecord(_))));
}

#[test]
fn test_remove() {
    let mut f = fixture(&[entry(1, "2024-01-01"), entry(2, "2024-02-01")]);
    f.session.remove(1).unwrap();

    assert_eq!(f.session.entries().len(), 1);
    assert_eq!(f.store.load().unwrap().len(), 1);

    let result = f.session.remove(1);
    assert!(matches!(result, Err(Error::RecordNotFound { id: 1 })));
}

#[test]
fn test_import_replaces_and_sorts() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("import.json");
    let imported = vec![entry(5, "2023-01-01"), entry(6, "2025-01-01")];
    std::fs::write(&path, serde_json::to_string(&imported).unwrap()).unwrap();

    let mut f = fixture(&[entry(1, "2024-01-01")]);
    let count = f.session.import(&path).unwrap();
    assert_eq!(count, 2);

    let entries = f.session.entries();
    assert_eq!(entries[0].id, 6);
    assert_eq!(entries[1].id, 5);
}

#[test]
fn test_import_failure_keeps_collection() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("import.json");
    std::fs::write(&path, r#"{"not": "an array"}"#).unwrap();

    let mut f = fixture(&[entry(1, "2024-01-01")]);
    assert!(f.session.import(&path).is_err());
    assert_eq!(f.session.entries().len(), 1);
    assert_eq!(f.store.load().unwrap().len(), 1);
}

#[test]
fn test_sync_commits_and_reports_success() {
    let mut f = fixture(&[entry(1, "2024-01-01")]);
    f.session
        .add(NewEntry {
            date: "2024-03-01".to_string(),
            title: "T".to_string(),
            description: "D".to_string(),
            ..NewEntry::default()
        })
        .unwrap();

    let outcome = f.session.sync(false, None).unwrap();
    assert!(matches!(outcome, SyncOutcome::Completed(_)));
    assert_eq!(f.session.sync_state(), SyncState::Success);

    let remote = f.api.content_of("src/data/timelineData.js").unwrap();
    let parsed = parse_embedded_data(std::str::from_utf8(&remote).unwrap()).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].id, 2);
}

#[test]
fn test_sync_dropped_while_in_flight() {
    let mut f = fixture(&[entry(1, "2024-01-01")]);
    f.session.set_sync_state(SyncState::Syncing);

    let outcome = f.session.sync(false, None).unwrap();
    assert!(matches!(outcome, SyncOutcome::AlreadySyncing));
    // The gate does not consume the in-flight state.
    assert_eq!(f.session.sync_state(), SyncState::Syncing);
}

#[test]
fn test_sync_conflict_aborts_without_force() {
    let mut f = fixture(&[entry(1, "2024-01-01")]);
    f.session.sync(false, None).unwrap();

    // The remote moves underneath.
    f.api
        .seed_file("src/data/timelineData.js", b"export const timelineData = [];");
    let drifted_sha = f.api.sha_of("src/data/timelineData.js").unwrap();

    let outcome = f.session.sync(false, None).unwrap();
    match outcome {
        SyncOutcome::Conflict(check) => {
            assert!(check.has_conflict);
            assert_eq!(check.current_sha.as_deref(), Some(drifted_sha.as_str()));
        }
        other => panic!("expected conflict, got {other:?}"),
    }
    // Nothing was written and the gate reopened.
    assert_eq!(f.api.sha_of("src/data/timelineData.js").unwrap(), drifted_sha);
    assert_eq!(f.session.sync_state(), SyncState::Idle);
}

#[test]
fn test_sync_force_overrides_conflict() {
    let mut f = fixture(&[entry(1, "2024-01-01")]);
    f.session.sync(false, None).unwrap();
    f.api
        .seed_file("src/data/timelineData.js", b"export const timelineData = [];");

    let outcome = f.session.sync(true, None).unwrap();
    assert!(matches!(outcome, SyncOutcome::Completed(_)));

    let remote = f.api.content_of("src/data/timelineData.js").unwrap();
    let parsed = parse_embedded_data(std::str::from_utf8(&remote).unwrap()).unwrap();
    assert_eq!(parsed.len(), 1);
}

#[test]
fn test_sync_error_leaves_local_data_untouched() {
    let mut f = fixture(&[entry(1, "2024-01-01")]);
    f.api.set_failing(true);

    // force skips the (fail-open) conflict check and hits the commit error.
    let result = f.session.sync(true, None);
    assert!(result.is_err());
    assert_eq!(f.session.sync_state(), SyncState::Error);
    assert_eq!(f.store.load().unwrap().len(), 1);
}

#[test]
fn test_close_performs_final_save() {
    let f = fixture(&[]);
    let store = f.store.clone();
    f.session.close();
    // The auto-save final tick persisted the (empty) collection.
    assert!(store.load().is_some());
}
