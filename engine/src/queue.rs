//! The pending-write queue.
//!
//! An entry exists in the queue iff its event has not yet been confirmed
//! written to the remote store. The queue itself is pure data; durability
//! and the actual writes are the client layer's job. Drain order is
//! original enqueue order, and a failed entry never blocks the ones
//! behind it.

use crate::error::{Error, Result};
use crate::event::{EventId, LocationEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version of the persisted queue format for future compatibility.
pub const QUEUE_FORMAT_VERSION: u32 = 1;

/// A not-yet-confirmed write, wrapping the event it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    /// The event awaiting a confirmed remote write
    pub event: LocationEvent,
    /// When the entry was enqueued
    pub queued_at: DateTime<Utc>,
}

/// Ordered, append-only list of not-yet-confirmed writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineQueue {
    entries: Vec<QueueEntry>,
}

impl OfflineQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry at the tail.
    ///
    /// No dedupe by event id happens here: enqueueing the same id twice
    /// produces two entries. Callers avoid it by invoking capture once per
    /// user action.
    pub fn enqueue(&mut self, event: LocationEvent, queued_at: DateTime<Utc>) {
        self.entries.push(QueueEntry { event, queued_at });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in original enqueue order.
    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    /// Remove the entries whose events were confirmed written, preserving
    /// the relative order of everything left.
    ///
    /// Removal is positional: each confirmed id removes one entry, so a
    /// duplicated id only releases a single entry per confirmation.
    pub fn remove_confirmed(&mut self, confirmed: &[EventId]) {
        let mut remaining: Vec<EventId> = confirmed.to_vec();
        self.entries.retain(|entry| {
            match remaining.iter().position(|id| *id == entry.event.id) {
                Some(idx) => {
                    remaining.swap_remove(idx);
                    false
                }
                None => true,
            }
        });
    }

    /// Snapshot the queue for persistence.
    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            format_version: QUEUE_FORMAT_VERSION,
            entries: self.entries.clone(),
        }
    }

    /// Rebuild a queue from a persisted snapshot.
    pub fn from_snapshot(snapshot: QueueSnapshot) -> Self {
        Self {
            entries: snapshot.entries,
        }
    }
}

/// Persisted form of the queue: an ordered array of entries plus a format
/// version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSnapshot {
    /// Snapshot format version
    pub format_version: u32,
    /// Entries in original enqueue order
    pub entries: Vec<QueueEntry>,
}

impl QueueSnapshot {
    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    /// Deserialize from JSON, rejecting snapshots from a newer format.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidSnapshot(e.to_string()))?;

        if snapshot.format_version > QUEUE_FORMAT_VERSION {
            return Err(Error::InvalidSnapshot(format!(
                "unsupported queue format version: {} (max supported: {})",
                snapshot.format_version, QUEUE_FORMAT_VERSION
            )));
        }

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(id_offset: i64) -> LocationEvent {
        let ts = Utc
            .with_ymd_and_hms(2025, 8, 10, 14, 30, 0)
            .unwrap()
            + chrono::Duration::seconds(id_offset);
        LocationEvent::new(ts, 51.5074, -0.1278)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 10, 15, 0, 0).unwrap()
    }

    #[test]
    fn enqueue_preserves_order() {
        let mut queue = OfflineQueue::new();
        for i in 0..4 {
            queue.enqueue(event(i), now());
        }

        assert_eq!(queue.len(), 4);
        let ids: Vec<_> = queue.entries().iter().map(|e| e.event.id.clone()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn remove_confirmed_keeps_failures_in_order() {
        let mut queue = OfflineQueue::new();
        let events: Vec<_> = (0..5).map(event).collect();
        for e in &events {
            queue.enqueue(e.clone(), now());
        }

        // Entries 0, 1 and 3 succeeded.
        queue.remove_confirmed(&[
            events[0].id.clone(),
            events[1].id.clone(),
            events[3].id.clone(),
        ]);

        let ids: Vec<_> = queue.entries().iter().map(|e| e.event.id.clone()).collect();
        assert_eq!(ids, vec![events[2].id.clone(), events[4].id.clone()]);
    }

    #[test]
    fn remove_confirmed_with_unknown_id_is_noop() {
        let mut queue = OfflineQueue::new();
        queue.enqueue(event(0), now());
        queue.remove_confirmed(&["not-there".to_string()]);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn duplicate_ids_are_allowed_and_released_one_at_a_time() {
        let mut queue = OfflineQueue::new();
        let e = event(0);
        queue.enqueue(e.clone(), now());
        queue.enqueue(e.clone(), now());
        assert_eq!(queue.len(), 2);

        queue.remove_confirmed(&[e.id.clone()]);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn snapshot_roundtrip() {
        let mut queue = OfflineQueue::new();
        queue.enqueue(event(0), now());
        queue.enqueue(event(1), now());

        let json = queue.snapshot().to_json().unwrap();
        let restored = OfflineQueue::from_snapshot(QueueSnapshot::from_json(&json).unwrap());

        assert_eq!(queue, restored);
    }

    #[test]
    fn corrupt_snapshot_is_an_error() {
        assert!(matches!(
            QueueSnapshot::from_json("not json at all"),
            Err(Error::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn reject_future_format_version() {
        let json = r#"{"formatVersion": 99, "entries": []}"#;
        assert!(matches!(
            QueueSnapshot::from_json(json),
            Err(Error::InvalidSnapshot(_))
        ));
    }
}
