//! Error taxonomy for the sync client.
//!
//! Nothing here is ever fatal to the host process: transport failures
//! queue the write, persistence failures degrade to an empty queue, and
//! validation or duplicate rejections leave all state untouched.

use thiserror::Error;

/// A failed exchange with the remote store's proxy.
///
/// Rate-limit responses are not special-cased: a 429 is a `Status` error
/// like any other non-2xx, eligible for queueing and retry.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("remote store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Decode(String),
}

/// Errors surfaced by the coordinator's public operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The candidate position is the same visit as the last logged one.
    #[error("location already logged within {radius_m}m (distance {distance_m:.1}m)")]
    Duplicate { distance_m: f64, radius_m: f64 },

    /// The event failed validation; nothing was queued or mutated.
    #[error(transparent)]
    Invalid(#[from] waylog_engine::Error),

    /// The transport failed; for writes the event was queued instead.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The durable queue could not be written.
    #[error("queue persistence failed: {0}")]
    Persistence(String),
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_display() {
        let err = SyncError::Duplicate {
            distance_m: 12.34,
            radius_m: 50.0,
        };
        assert_eq!(
            err.to_string(),
            "location already logged within 50m (distance 12.3m)"
        );
    }

    #[test]
    fn status_display() {
        let err = TransportError::Status {
            status: 429,
            body: "rate limited".into(),
        };
        assert_eq!(err.to_string(), "remote store returned 429: rate limited");
    }
}
