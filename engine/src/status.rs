//! Sync status observed by the UI.
//!
//! Only the coordinator transitions the status, and every transition
//! carries the current queue length so the indicator can show how many
//! events still await a confirmed write.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The coordinator's externally visible state.
///
/// There are no terminal states; the machine cycles for the life of the
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    /// Nothing in flight
    Idle,
    /// A read of the remote store is in flight
    Loading,
    /// A read completed
    Loaded,
    /// A queue drain is in flight
    Syncing,
    /// The last write (or drain) was confirmed remotely
    Synced,
    /// The last capture went to the local queue
    Queued,
    /// The last read or drain failed; queued entries remain
    Error,
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyncStatus::Idle => "idle",
            SyncStatus::Loading => "loading",
            SyncStatus::Loaded => "loaded",
            SyncStatus::Syncing => "syncing",
            SyncStatus::Synced => "synced",
            SyncStatus::Queued => "queued",
            SyncStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// A status transition as delivered to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: SyncStatus,
    /// Queue length at the moment of the transition
    pub queue_len: usize,
}

impl StatusUpdate {
    pub fn new(status: SyncStatus, queue_len: usize) -> Self {
        Self { status, queue_len }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_wire_form() {
        assert_eq!(SyncStatus::Synced.to_string(), "synced");
        assert_eq!(SyncStatus::Queued.to_string(), "queued");
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&SyncStatus::Syncing).unwrap();
        assert_eq!(json, "\"syncing\"");
    }

    #[test]
    fn update_roundtrip() {
        let update = StatusUpdate::new(SyncStatus::Queued, 3);
        let json = serde_json::to_string(&update).unwrap();
        assert!(json.contains("queueLen"));
        let parsed: StatusUpdate = serde_json::from_str(&json).unwrap();
        assert_eq!(update, parsed);
    }
}
