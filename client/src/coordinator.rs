//! The sync coordinator.
//!
//! Single logical actor for everything with an invariant: the queue, the
//! last logged position, and the observable status all mutate through
//! here, under one mutex. A capture runs to completion before the next is
//! accepted, and a drain never interleaves with a capture.
//!
//! The coordinator is constructed explicitly and injected into whatever
//! captures events; it never subscribes to platform connectivity events
//! itself. The environment layer calls [`SyncCoordinator::notify_online`],
//! [`SyncCoordinator::notify_offline`], and
//! [`SyncCoordinator::notify_visible`] as the real signals arrive.

use crate::config::Config;
use crate::error::{Result, SyncError, TransportError};
use crate::persist::QueueStore;
use crate::remote::{QueryOutcome, RemoteStore};
use chrono::Utc;
use tokio::sync::{broadcast, Mutex};
use waylog_engine::{
    DuplicateDetector, LocationEvent, OfflineQueue, RemoteId, StatusUpdate, SyncStatus,
};

/// How a capture completed. Either way the event is recorded somewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Written to the remote store and confirmed
    Synced(RemoteId),
    /// Held in the durable queue for a later drain
    Queued { queue_len: usize },
}

/// Result of a queue drain attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    /// Entries confirmed written during this drain
    pub succeeded: usize,
    /// Entries still queued afterwards
    pub remaining: usize,
}

/// State guarded by the single-flight mutex.
struct State {
    queue: OfflineQueue,
    detector: DuplicateDetector,
    online: bool,
}

/// Orchestrates captures, queue drains, and remote reads.
pub struct SyncCoordinator<R: RemoteStore, S: QueueStore> {
    remote: R,
    store: S,
    config: Config,
    state: Mutex<State>,
    status_tx: broadcast::Sender<StatusUpdate>,
}

impl<R: RemoteStore, S: QueueStore> SyncCoordinator<R, S> {
    /// Build a coordinator, restoring any queue persisted by a previous
    /// run. Starts in the online state until told otherwise.
    pub fn new(remote: R, store: S, config: Config) -> Self {
        let queue = store.load();
        if !queue.is_empty() {
            tracing::info!(queued = queue.len(), "restored persisted queue");
        }
        let detector = DuplicateDetector::new(config.dedup_radius_m);
        let (status_tx, _) = broadcast::channel(32);

        Self {
            remote,
            store,
            config,
            state: Mutex::new(State {
                queue,
                detector,
                online: true,
            }),
            status_tx,
        }
    }

    /// Subscribe to status transitions. Delivery is best-effort and
    /// transitions are not replayed to late subscribers.
    pub fn subscribe(&self) -> broadcast::Receiver<StatusUpdate> {
        self.status_tx.subscribe()
    }

    /// Current queue length.
    pub async fn queue_len(&self) -> usize {
        self.state.lock().await.queue.len()
    }

    /// Whether the coordinator currently believes it is online.
    pub async fn is_online(&self) -> bool {
        self.state.lock().await.online
    }

    /// Log one captured event.
    ///
    /// Validation and duplicate rejection fail fast with no state change
    /// and no queue effect. Otherwise the capture always completes: a
    /// confirmed remote write when online, a durable queue entry on the
    /// offline flag or any transport failure.
    pub async fn capture(&self, event: LocationEvent) -> Result<CaptureOutcome> {
        event.validate(self.config.description_max_words)?;

        let mut state = self.state.lock().await;

        let position = event.coordinates();
        if state.detector.is_duplicate(position) {
            let distance_m = state.detector.distance_from_last(position).unwrap_or(0.0);
            return Err(SyncError::Duplicate {
                distance_m,
                radius_m: self.config.dedup_radius_m,
            });
        }

        if state.online {
            match self.create_with_retry(&event).await {
                Ok(remote_id) => {
                    state.detector.record(position);
                    self.emit(SyncStatus::Synced, state.queue.len());
                    return Ok(CaptureOutcome::Synced(remote_id));
                }
                Err(err) => {
                    tracing::warn!(event = %event.id, "direct write failed, queueing: {err}");
                }
            }
        }

        state.queue.enqueue(event, Utc::now());
        self.persist(&state.queue);
        state.detector.record(position);

        let queue_len = state.queue.len();
        self.emit(SyncStatus::Queued, queue_len);
        Ok(CaptureOutcome::Queued { queue_len })
    }

    /// Connectivity came back; drain the queue.
    pub async fn notify_online(&self) -> DrainReport {
        let mut state = self.state.lock().await;
        state.online = true;
        self.drain_queue(&mut state).await
    }

    /// Connectivity was lost; subsequent captures queue immediately.
    pub async fn notify_offline(&self) {
        self.state.lock().await.online = false;
    }

    /// The process became visible again; drain if we believe we are
    /// online.
    pub async fn notify_visible(&self) -> DrainReport {
        let mut state = self.state.lock().await;
        if !state.online {
            return DrainReport {
                succeeded: 0,
                remaining: state.queue.len(),
            };
        }
        self.drain_queue(&mut state).await
    }

    /// Fetch all events from the remote store.
    ///
    /// Failures are surfaced to the caller, not retried automatically.
    pub async fn refresh(&self) -> Result<QueryOutcome> {
        let queue_len = self.state.lock().await.queue.len();
        self.emit(SyncStatus::Loading, queue_len);

        match self.remote.query().await {
            Ok(outcome) => {
                if outcome.skipped > 0 {
                    tracing::warn!(skipped = outcome.skipped, "query skipped undecodable records");
                }
                self.emit(SyncStatus::Loaded, queue_len);
                Ok(outcome)
            }
            Err(err) => {
                self.emit(SyncStatus::Error, queue_len);
                Err(err.into())
            }
        }
    }

    /// Attempt every queued entry in original order. A failed entry stays
    /// put and does not block the ones behind it; the queue is persisted
    /// once after the batch.
    async fn drain_queue(&self, state: &mut State) -> DrainReport {
        if state.queue.is_empty() {
            return DrainReport {
                succeeded: 0,
                remaining: 0,
            };
        }

        self.emit(SyncStatus::Syncing, state.queue.len());

        let events: Vec<LocationEvent> = state
            .queue
            .entries()
            .iter()
            .map(|entry| entry.event.clone())
            .collect();

        let mut confirmed = Vec::new();
        for event in &events {
            match self.remote.create(event).await {
                Ok(_) => {
                    tracing::debug!(event = %event.id, "queued write confirmed");
                    confirmed.push(event.id.clone());
                }
                Err(err) => {
                    tracing::warn!(event = %event.id, "queued write failed, keeping entry: {err}");
                }
            }
        }

        state.queue.remove_confirmed(&confirmed);
        self.persist(&state.queue);

        let remaining = state.queue.len();
        if remaining == 0 {
            self.emit(SyncStatus::Synced, 0);
        } else {
            self.emit(SyncStatus::Error, remaining);
        }

        DrainReport {
            succeeded: confirmed.len(),
            remaining,
        }
    }

    /// Direct-write retry wrapper. Queued writes go through the queue's
    /// own drain cycle instead.
    async fn create_with_retry(
        &self,
        event: &LocationEvent,
    ) -> std::result::Result<RemoteId, TransportError> {
        let attempts = self.config.retry_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.remote.create(event).await {
                Ok(remote_id) => return Ok(remote_id),
                Err(err) if attempt < attempts => {
                    tracing::debug!(attempt, "direct write failed, retrying: {err}");
                    tokio::time::sleep(self.config.retry_delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// A write failure here must not lose the capture: the entry is still
    /// in the in-memory queue and will be rewritten on the next persist.
    fn persist(&self, queue: &OfflineQueue) {
        if let Err(err) = self.store.save(queue) {
            tracing::warn!("failed to persist queue: {err}");
        }
    }

    fn emit(&self, status: SyncStatus, queue_len: usize) {
        let _ = self.status_tx.send(StatusUpdate::new(status, queue_len));
    }
}
