//! Wire schema mapping for the remote store.
//!
//! Writes carry the event's flat public attributes; the proxy owns the
//! mapping into the store's property types. Reads come back in the
//! store's native schema - every value wrapped in a typed property
//! (number, date, select, rich text) - and are decoded here one record at
//! a time, so a single malformed record never aborts a whole query.

use chrono::{DateTime, Utc};
use serde_json::Value;
use waylog_engine::LocationEvent;

/// Why a single remote record could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("record has no id")]
    MissingId,

    #[error("record {0} is missing latitude or longitude")]
    MissingCoordinates(String),

    #[error("record {0} has a missing or unparsable timestamp")]
    BadTimestamp(String),

    #[error("record is not an object")]
    NotAnObject,
}

/// Decode one remote record into a typed event.
///
/// `day`, `city`, and `transport_mode` fall back to the store's defaults
/// when absent, matching what the proxy writes for empty fields. A record
/// missing either coordinate is rejected: the remote store does not
/// enforce their presence, so the client must.
pub fn decode_record(record: &Value) -> Result<LocationEvent, DecodeError> {
    if !record.is_object() {
        return Err(DecodeError::NotAnObject);
    }

    let id = record
        .get("id")
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingId)?
        .to_string();

    let props = record.get("properties").unwrap_or(&Value::Null);

    let latitude = number(props, "Latitude");
    let longitude = number(props, "Longitude");
    let (latitude, longitude) = match (latitude, longitude) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return Err(DecodeError::MissingCoordinates(id)),
    };

    let timestamp = date(props, "Timestamp").ok_or_else(|| DecodeError::BadTimestamp(id.clone()))?;

    let weather = rich_text(props, "Weather").filter(|s| !s.is_empty());
    let photo_url = props
        .get("Photo_URL")
        .and_then(|p| p.get("url"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(LocationEvent {
        id,
        timestamp,
        latitude,
        longitude,
        accuracy: number(props, "Accuracy"),
        location: rich_text(props, "Location").unwrap_or_default(),
        description: rich_text(props, "Description").unwrap_or_default(),
        day: select(props, "Day").unwrap_or_else(|| "Day 1".to_string()),
        city: select(props, "City").unwrap_or_else(|| "Other".to_string()),
        transport_mode: select(props, "Transport_Mode").unwrap_or_else(|| "Walking".to_string()),
        weather,
        photo_url,
    })
}

fn number(props: &Value, name: &str) -> Option<f64> {
    props.get(name)?.get("number")?.as_f64()
}

fn date(props: &Value, name: &str) -> Option<DateTime<Utc>> {
    let start = props.get(name)?.get("date")?.get("start")?.as_str()?;
    DateTime::parse_from_rfc3339(start)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn select(props: &Value, name: &str) -> Option<String> {
    Some(
        props
            .get(name)?
            .get("select")?
            .get("name")?
            .as_str()?
            .to_string(),
    )
}

fn rich_text(props: &Value, name: &str) -> Option<String> {
    Some(
        props
            .get(name)?
            .get("rich_text")?
            .get(0)?
            .get("text")?
            .get("content")?
            .as_str()?
            .to_string(),
    )
}
