//! Configuration for the sync client.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use waylog_engine::{DEFAULT_DESCRIPTION_MAX_WORDS, DEFAULT_DUPLICATE_RADIUS_M};

/// Client configuration.
///
/// Defaults mirror the remote store's published limits: three requests per
/// second (advisory only, never enforced locally), three retry attempts
/// with a one second delay for direct writes.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the credential-hiding proxy in front of the remote store
    pub endpoint: String,
    /// Where the persisted queue lives
    pub queue_path: PathBuf,
    /// Radius under which two captures are the same visit
    pub dedup_radius_m: f64,
    /// Word ceiling for event descriptions
    pub description_max_words: usize,
    /// Advisory remote rate limit; informational only
    pub requests_per_second: u32,
    /// Attempts for a direct (non-queued) write before it is queued
    pub retry_attempts: u32,
    /// Delay between direct-write attempts
    pub retry_delay: Duration,
}

impl Config {
    /// Configuration with the stock defaults.
    pub fn new(endpoint: impl Into<String>, queue_path: impl Into<PathBuf>) -> Self {
        Self {
            endpoint: endpoint.into(),
            queue_path: queue_path.into(),
            dedup_radius_m: DEFAULT_DUPLICATE_RADIUS_M,
            description_max_words: DEFAULT_DESCRIPTION_MAX_WORDS,
            requests_per_second: 3,
            retry_attempts: 3,
            retry_delay: Duration::from_millis(1000),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// `WAYLOG_ENDPOINT` and `WAYLOG_QUEUE_PATH` are required; the rest
    /// fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint = env::var("WAYLOG_ENDPOINT").map_err(|_| ConfigError::MissingEndpoint)?;
        let queue_path =
            env::var("WAYLOG_QUEUE_PATH").map_err(|_| ConfigError::MissingQueuePath)?;

        let mut config = Self::new(endpoint, queue_path);

        if let Ok(radius) = env::var("WAYLOG_DEDUP_RADIUS_M") {
            config.dedup_radius_m = radius
                .parse()
                .map_err(|_| ConfigError::InvalidNumber("WAYLOG_DEDUP_RADIUS_M"))?;
        }
        if let Ok(attempts) = env::var("WAYLOG_RETRY_ATTEMPTS") {
            config.retry_attempts = attempts
                .parse()
                .map_err(|_| ConfigError::InvalidNumber("WAYLOG_RETRY_ATTEMPTS"))?;
        }
        if let Ok(delay_ms) = env::var("WAYLOG_RETRY_DELAY_MS") {
            let ms: u64 = delay_ms
                .parse()
                .map_err(|_| ConfigError::InvalidNumber("WAYLOG_RETRY_DELAY_MS"))?;
            config.retry_delay = Duration::from_millis(ms);
        }

        Ok(config)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("WAYLOG_ENDPOINT environment variable is required")]
    MissingEndpoint,

    #[error("WAYLOG_QUEUE_PATH environment variable is required")]
    MissingQueuePath,

    #[error("invalid numeric value for {0}")]
    InvalidNumber(&'static str),
}
