//! The remote store client.
//!
//! All traffic goes through a credential-hiding proxy; the client only
//! needs two capabilities - create one event, query all events - so the
//! boundary is a trait. The HTTP implementation does not retry: retry is
//! the queue's responsibility, and a rate-limit response is just another
//! transport failure.

use crate::error::TransportError;
use crate::schema::decode_record;
use async_trait::async_trait;
use serde_json::Value;
use waylog_engine::{LocationEvent, RemoteId};

/// Result of querying all events from the remote store.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    /// Events that decoded cleanly, in the order the store returned them
    pub events: Vec<LocationEvent>,
    /// Remote records that were skipped because they failed to decode
    pub skipped: usize,
}

/// Capability-typed access to the remote store.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Write one event; returns the identifier the store assigned.
    async fn create(&self, event: &LocationEvent) -> Result<RemoteId, TransportError>;

    /// Fetch all events.
    async fn query(&self) -> Result<QueryOutcome, TransportError>;
}

/// HTTP implementation of [`RemoteStore`] against the proxy endpoint.
pub struct HttpRemoteStore {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpRemoteStore {
    /// Create a client for the given proxy endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn create(&self, event: &LocationEvent) -> Result<RemoteId, TransportError> {
        let url = format!("{}?action=create", self.endpoint);
        let response = self.http.post(&url).json(event).send().await?;
        let response = Self::check_status(response).await?;

        let body: Value = response.json().await?;
        body.get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| TransportError::Decode("create response has no id".to_string()))
    }

    async fn query(&self) -> Result<QueryOutcome, TransportError> {
        let url = format!("{}?action=query", self.endpoint);
        let response = self.http.get(&url).send().await?;
        let response = Self::check_status(response).await?;

        let records: Vec<Value> = response.json().await?;
        Ok(decode_records(&records))
    }
}

/// Decode a batch of remote records, skipping and counting the ones that
/// fail instead of aborting the whole query.
fn decode_records(records: &[Value]) -> QueryOutcome {
    let mut events = Vec::with_capacity(records.len());
    let mut skipped = 0;
    for record in records {
        match decode_record(record) {
            Ok(event) => events.push(event),
            Err(err) => {
                skipped += 1;
                tracing::warn!("skipping undecodable remote record: {err}");
            }
        }
    }

    QueryOutcome { events, skipped }
}
