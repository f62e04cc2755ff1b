//! The location event model.
//!
//! An event is created once at capture time and never mutated afterwards.
//! Whether it is local-only, queued, or confirmed remotely is tracked by
//! queue membership, not by the record itself.

use crate::error::{Error, Result};
use crate::geo::Coordinates;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for an event, assigned at capture time.
pub type EventId = String;

/// Identifier assigned by the remote store on a confirmed write.
pub type RemoteId = String;

/// Maximum number of words allowed in an event description.
pub const DEFAULT_DESCRIPTION_MAX_WORDS: usize = 10;

/// A single GPS-tagged log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationEvent {
    /// Capture-time identifier, never reused
    pub id: EventId,
    /// Capture instant on the device clock
    pub timestamp: DateTime<Utc>,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// GPS accuracy radius in metres, when the fix reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    /// Human-readable place name
    pub location: String,
    /// Free-text note, bounded by a word ceiling
    pub description: String,
    /// Trip day label (e.g. "Day 3")
    pub day: String,
    /// City bucket the event falls into
    pub city: String,
    /// How the traveller was moving at capture time
    pub transport_mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl LocationEvent {
    /// Create an event with an id derived from the capture timestamp.
    pub fn new(timestamp: DateTime<Utc>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: event_id_from(timestamp),
            timestamp,
            latitude,
            longitude,
            accuracy: None,
            location: String::new(),
            description: String::new(),
            day: String::new(),
            city: String::new(),
            transport_mode: String::new(),
            weather: None,
            photo_url: None,
        }
    }

    /// The event's coordinate pair.
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Validate the event before capture is accepted.
    ///
    /// Both coordinates must be finite and the description must fit the
    /// word ceiling.
    pub fn validate(&self, max_words: usize) -> Result<()> {
        if !self.latitude.is_finite() {
            return Err(Error::MissingCoordinate("latitude"));
        }
        if !self.longitude.is_finite() {
            return Err(Error::MissingCoordinate("longitude"));
        }
        let words = word_count(&self.description);
        if words > max_words {
            return Err(Error::DescriptionTooLong {
                words,
                max: max_words,
            });
        }
        Ok(())
    }
}

/// Derive an event id from the capture instant (millisecond precision).
pub fn event_id_from(timestamp: DateTime<Utc>) -> EventId {
    timestamp.timestamp_millis().to_string()
}

/// Count whitespace-separated words, treating blank text as zero.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Transport mode inferred from GPS speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportMode {
    Walking,
    Tube,
    Train,
    Car,
    Flight,
}

impl TransportMode {
    /// Infer a mode from a GPS speed reading in metres per second.
    ///
    /// Thresholds (in mph) are checked in order: walking, tube, train,
    /// car, then flight. The car threshold (70) sits below the train one
    /// (100), so speed alone never resolves to Car; it stays selectable
    /// by hand. A missing reading means walking.
    pub fn from_speed(speed_mps: Option<f64>) -> Self {
        let Some(speed) = speed_mps else {
            return TransportMode::Walking;
        };
        let mph = speed * 2.237;
        if mph < 5.0 {
            TransportMode::Walking
        } else if mph < 30.0 {
            TransportMode::Tube
        } else if mph < 100.0 {
            TransportMode::Train
        } else if mph < 70.0 {
            TransportMode::Car
        } else {
            TransportMode::Flight
        }
    }

    /// Label used in the event's `transport_mode` attribute.
    pub fn label(&self) -> &'static str {
        match self {
            TransportMode::Walking => "Walking",
            TransportMode::Tube => "Tube",
            TransportMode::Train => "Train",
            TransportMode::Car => "Car",
            TransportMode::Flight => "Flight",
        }
    }
}
