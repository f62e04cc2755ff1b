//! # Waylog Client
//!
//! The IO shell around the Waylog engine: an HTTP client for the remote
//! store's proxy, a durable file-backed queue, and the coordinator that
//! decides whether a capture writes straight through or queues for a
//! later drain.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use waylog_client::{Config, FileQueueStore, HttpRemoteStore, SyncCoordinator};
//! use waylog_engine::LocationEvent;
//!
//! # async fn demo() -> waylog_client::Result<()> {
//! let config = Config::new(
//!     "https://trip.example/.netlify/functions/store-proxy",
//!     "/var/lib/waylog/queue.json",
//! );
//! let coordinator = SyncCoordinator::new(
//!     HttpRemoteStore::new(config.endpoint.clone()),
//!     FileQueueStore::new(config.queue_path.clone()),
//!     config,
//! );
//!
//! let mut status = coordinator.subscribe();
//!
//! let mut event = LocationEvent::new(Utc::now(), 51.5074, -0.1278);
//! event.location = "Trafalgar Square".to_string();
//! coordinator.capture(event).await?;
//!
//! // Environment layer forwards real connectivity signals:
//! coordinator.notify_offline().await;
//! coordinator.notify_online().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod persist;
pub mod remote;
pub mod schema;

pub use config::{Config, ConfigError};
pub use coordinator::{CaptureOutcome, DrainReport, SyncCoordinator};
pub use error::{Result, SyncError, TransportError};
pub use persist::{FileQueueStore, MemoryQueueStore, QueueStore};
pub use remote::{HttpRemoteStore, QueryOutcome, RemoteStore};
pub use schema::{decode_record, DecodeError};
