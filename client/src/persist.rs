//! Durable storage for the offline queue.
//!
//! The queue is rewritten in full after every enqueue and drain, via a
//! temp file and rename so a crash mid-write leaves the previous queue
//! intact. Loading never fails: a missing file is an empty queue, and a
//! corrupt file is discarded with a warning - losing queued data is
//! preferable to crashing the capture flow.

use crate::error::SyncError;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use waylog_engine::{OfflineQueue, QueueSnapshot};

/// Where the queue lives between process restarts.
pub trait QueueStore: Send + Sync {
    /// Load the persisted queue; degrades to empty, never fails.
    fn load(&self) -> OfflineQueue;

    /// Persist the full queue before returning.
    fn save(&self, queue: &OfflineQueue) -> Result<(), SyncError>;
}

/// JSON-file-backed queue store.
pub struct FileQueueStore {
    path: PathBuf,
}

impl FileQueueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl QueueStore for FileQueueStore {
    fn load(&self) -> OfflineQueue {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return OfflineQueue::new();
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), "unreadable queue file, starting empty: {err}");
                return OfflineQueue::new();
            }
        };

        match QueueSnapshot::from_json(&json) {
            Ok(snapshot) => OfflineQueue::from_snapshot(snapshot),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), "discarding corrupt queue file: {err}");
                OfflineQueue::new()
            }
        }
    }

    fn save(&self, queue: &OfflineQueue) -> Result<(), SyncError> {
        let json = queue
            .snapshot()
            .to_json()
            .map_err(|e| SyncError::Persistence(e.to_string()))?;

        let tmp = self.temp_path();
        fs::write(&tmp, json).map_err(|e| SyncError::Persistence(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| SyncError::Persistence(e.to_string()))?;
        Ok(())
    }
}

/// In-memory queue store for tests.
#[derive(Default)]
pub struct MemoryQueueStore {
    saved: Mutex<Option<String>>,
}

impl MemoryQueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in the last saved snapshot.
    pub fn saved_len(&self) -> usize {
        self.saved
            .lock()
            .unwrap()
            .as_deref()
            .and_then(|json| QueueSnapshot::from_json(json).ok())
            .map(|s| s.entries.len())
            .unwrap_or(0)
    }
}

impl QueueStore for MemoryQueueStore {
    fn load(&self) -> OfflineQueue {
        self.saved
            .lock()
            .unwrap()
            .as_deref()
            .and_then(|json| QueueSnapshot::from_json(json).ok())
            .map(OfflineQueue::from_snapshot)
            .unwrap_or_default()
    }

    fn save(&self, queue: &OfflineQueue) -> Result<(), SyncError> {
        let json = queue
            .snapshot()
            .to_json()
            .map_err(|e| SyncError::Persistence(e.to_string()))?;
        *self.saved.lock().unwrap() = Some(json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use waylog_engine::LocationEvent;

    fn sample_queue() -> OfflineQueue {
        let ts = Utc.with_ymd_and_hms(2025, 8, 10, 14, 30, 0).unwrap();
        let mut queue = OfflineQueue::new();
        queue.enqueue(LocationEvent::new(ts, 51.5074, -0.1278), ts);
        queue.enqueue(
            LocationEvent::new(ts + chrono::Duration::seconds(90), 53.4808, -2.2426),
            ts,
        );
        queue
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileQueueStore::new(dir.path().join("queue.json"));

        let queue = sample_queue();
        store.save(&queue).unwrap();

        assert_eq!(store.load(), queue);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileQueueStore::new(dir.path().join("never-written.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queue.json");
        fs::write(&path, "{{{ definitely not json").unwrap();

        let store = FileQueueStore::new(path);
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileQueueStore::new(dir.path().join("queue.json"));

        store.save(&sample_queue()).unwrap();
        store.save(&OfflineQueue::new()).unwrap();

        assert!(store.load().is_empty());
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryQueueStore::new();
        assert!(store.load().is_empty());

        let queue = sample_queue();
        store.save(&queue).unwrap();
        assert_eq!(store.saved_len(), 2);
        assert_eq!(store.load(), queue);
    }
}
