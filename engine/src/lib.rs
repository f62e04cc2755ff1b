//! # Waylog Engine
//!
//! The offline-first core of Waylog, a GPS event logger for travellers.
//!
//! This crate holds the logic with real invariants: the duplicate-visit
//! detector, the ordered pending-write queue, and the status values the
//! rest of the app observes. It has no IO of its own - the network, the
//! filesystem, and the wall clock all live in the client crate.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine has no knowledge of files, network, or platform
//! - **Deterministic**: the same inputs always produce the same outputs
//! - **Testable**: pure logic, no mocks needed
//!
//! ## Core Concepts
//!
//! ### Events
//!
//! A [`LocationEvent`] is a single GPS-tagged log entry, created once at
//! capture time and never mutated. Its id is derived from the capture
//! timestamp. Whether an event is local-only, queued, or confirmed
//! remotely is tracked by queue membership.
//!
//! ### Duplicate detection
//!
//! The [`DuplicateDetector`] compares a candidate fix against the single
//! most recent accepted capture. Two fixes within the dedup radius
//! (50 m by default) are the same visit; GPS jitter must not produce two
//! records of it.
//!
//! ### The queue
//!
//! The [`OfflineQueue`] is the ordered list of writes not yet confirmed by
//! the remote store. An entry is in the queue iff its event is
//! unconfirmed. Drains process entries in enqueue order, and a failure
//! leaves the entry in place without blocking the ones behind it.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::Utc;
//! use waylog_engine::{DuplicateDetector, LocationEvent, OfflineQueue};
//!
//! let mut event = LocationEvent::new(Utc::now(), 51.5074, -0.1278);
//! event.location = "Trafalgar Square".to_string();
//! event.validate(10).unwrap();
//!
//! let mut detector = DuplicateDetector::default();
//! assert!(!detector.is_duplicate(event.coordinates()));
//! detector.record(event.coordinates());
//!
//! let mut queue = OfflineQueue::new();
//! queue.enqueue(event, Utc::now());
//! assert_eq!(queue.len(), 1);
//! ```
//!
//! ## Persistence
//!
//! Use [`OfflineQueue::snapshot`] and [`OfflineQueue::from_snapshot`] with
//! [`QueueSnapshot`] for persistence. Snapshots serialize to JSON with a
//! format version for forward compatibility.

pub mod dedup;
pub mod error;
pub mod event;
pub mod geo;
pub mod queue;
pub mod status;

// Re-export main types at crate root
pub use dedup::{DuplicateDetector, DEFAULT_DUPLICATE_RADIUS_M};
pub use error::Error;
pub use event::{
    event_id_from, word_count, EventId, LocationEvent, RemoteId, TransportMode,
    DEFAULT_DESCRIPTION_MAX_WORDS,
};
pub use geo::{haversine, Coordinates, EARTH_RADIUS_M};
pub use queue::{OfflineQueue, QueueEntry, QueueSnapshot, QUEUE_FORMAT_VERSION};
pub use status::{StatusUpdate, SyncStatus};
