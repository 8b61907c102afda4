//! Periodic auto-save of the in-memory collection.
//!
//! A background thread saves the shared collection to the local store on a
//! fixed interval and once more on shutdown, mirroring the interval +
//! before-unload pair of triggers. The thread is owned by a handle whose
//! `stop`/`Drop` deterministically cancels the interval and performs the
//! final save, so no timer outlives the editing session.

use crate::model::TimelineEntry;
use crate::store::LocalStore;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::debug;

/// Save-in-progress and last-success markers for UI feedback.
#[derive(Clone, Default)]
pub struct AutosaveStatus {
    inner: Arc<RwLock<StatusInner>>,
}

#[derive(Default)]
struct StatusInner {
    is_saving: bool,
    last_saved: Option<DateTime<Utc>>,
}

impl AutosaveStatus {
    /// Whether a save tick is currently running.
    pub fn is_saving(&self) -> bool {
        self.inner.read().is_saving
    }

    /// Timestamp of the last successful auto-save.
    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.inner.read().last_saved
    }

    fn tick(&self, store: &LocalStore, entries: &RwLock<Vec<TimelineEntry>>) {
        self.inner.write().is_saving = true;
        let snapshot = entries.read().clone();
        let saved = store.save(&snapshot);
        let mut inner = self.inner.write();
        if saved {
            inner.last_saved = Some(Utc::now());
        }
        inner.is_saving = false;
    }
}

/// Owning handle of the auto-save thread.
///
/// Dropping the handle (or calling [`stop`](Self::stop)) cancels the
/// interval, performs one final save, and joins the thread.
pub struct AutosaveHandle {
    stop_tx: Sender<()>,
    join: Option<JoinHandle<()>>,
    status: AutosaveStatus,
}

impl AutosaveHandle {
    /// Start auto-saving `entries` to `store` every `interval`.
    pub fn start(
        entries: Arc<RwLock<Vec<TimelineEntry>>>,
        store: LocalStore,
        interval: Duration,
    ) -> Self {
        let status = AutosaveStatus::default();
        let thread_status = status.clone();
        let (stop_tx, stop_rx) = mpsc::channel();

        let join = std::thread::spawn(move || {
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        thread_status.tick(&store, &entries);
                    }
                    // Stop requested or handle dropped: one final save.
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                        thread_status.tick(&store, &entries);
                        debug!("auto-save stopped");
                        return;
                    }
                }
            }
        });

        Self {
            stop_tx,
            join: Some(join),
            status,
        }
    }

    /// Save progress markers for UI feedback.
    pub fn status(&self) -> AutosaveStatus {
        self.status.clone()
    }

    /// Stop the interval after one final save attempt.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(join) = self.join.take() {
            // Ignore send failure: the thread already exited.
            let _ = self.stop_tx.send(());
            let _ = join.join();
        }
    }
}

impl Drop for AutosaveHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::KvStore;

    fn entry(id: u64) -> TimelineEntry {
        TimelineEntry {
            date: "2024-01-01".to_string(),
            title: format!("entry {id}"),
            description: "text".to_string(),
            kind: "daily".to_string(),
            tags: vec![],
            images: vec![],
            id,
        }
    }

    #[test]
    fn test_periodic_save() {
        let store = LocalStore::new(KvStore::memory());
        let entries = Arc::new(RwLock::new(vec![entry(1)]));

        let handle =
            AutosaveHandle::start(entries.clone(), store.clone(), Duration::from_millis(20));

        // Wait for at least one tick.
        std::thread::sleep(Duration::from_millis(80));
        assert_eq!(store.load().unwrap().len(), 1);
        assert!(handle.status().last_saved().is_some());

        // Later ticks pick up mutations.
        entries.write().push(entry(2));
        std::thread::sleep(Duration::from_millis(80));
        assert_eq!(store.load().unwrap().len(), 2);

        handle.stop();
    }

    #[test]
    fn test_final_save_on_stop() {
        let store = LocalStore::new(KvStore::memory());
        let entries = Arc::new(RwLock::new(vec![entry(1)]));

        // Interval far beyond the test duration: only the final save runs.
        let handle =
            AutosaveHandle::start(entries.clone(), store.clone(), Duration::from_secs(3600));
        entries.write().push(entry(2));
        handle.stop();

        assert_eq!(store.load().unwrap().len(), 2);
    }

    #[test]
    fn test_final_save_on_drop() {
        let store = LocalStore::new(KvStore::memory());
        let entries = Arc::new(RwLock::new(vec![entry(1)]));

        {
            let _handle =
                AutosaveHandle::start(entries.clone(), store.clone(), Duration::from_secs(3600));
        }

        assert!(store.load().is_some());
    }
}
