//! Realtime event envelope and typed payloads
//!
//! The wire format is a lenient JSON envelope `{type, data, timestamp}`.
//! The `type` string is the dispatch discriminator; `data` is whatever the
//! server attached. Known tags lower into [`EventKind`] variants with
//! concrete payload shapes, everything else lands in `Unknown`.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Tags the server uses as dispatch discriminators
pub mod tags {
    /// A booking was created, updated, or cancelled
    pub const BOOKING_UPDATE: &str = "booking_update";
    /// A user-facing notification was pushed
    pub const NOTIFICATION: &str = "notification";
    /// Admin dashboard aggregates changed
    pub const DASHBOARD_UPDATE: &str = "dashboard_update";
    /// A tracked vehicle reported a new GPS position
    pub const VEHICLE_LOCATION: &str = "vehicle_location";
}

/// Wire envelope for realtime events
///
/// Only JSON well-formedness is required; a missing `data` or `timestamp`
/// does not make a frame malformed.
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeEnvelope {
    #[serde(rename = "type")]
    pub tag: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub timestamp: String,
}

impl RealtimeEnvelope {
    /// Parse an inbound text frame
    pub fn parse(text: &str) -> crate::realtime::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Server-side event time, if the timestamp parses as RFC 3339
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    /// Lower the envelope into a typed event
    pub fn kind(&self) -> EventKind {
        EventKind::of(self)
    }
}

/// Typed view of a realtime event, keyed by the wire tag
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    BookingUpdated(BookingUpdate),
    NotificationReceived(NotificationPush),
    DashboardChanged,
    VehicleMoved(VehiclePosition),
    /// Unrecognized tag, or a known tag whose payload did not match
    Unknown(String),
}

impl EventKind {
    pub fn of(envelope: &RealtimeEnvelope) -> Self {
        match envelope.tag.as_str() {
            tags::BOOKING_UPDATE => decode(envelope)
                .map(EventKind::BookingUpdated)
                .unwrap_or_else(|| EventKind::Unknown(envelope.tag.clone())),
            tags::NOTIFICATION => decode(envelope)
                .map(EventKind::NotificationReceived)
                .unwrap_or_else(|| EventKind::Unknown(envelope.tag.clone())),
            tags::DASHBOARD_UPDATE => EventKind::DashboardChanged,
            tags::VEHICLE_LOCATION => decode(envelope)
                .map(EventKind::VehicleMoved)
                .unwrap_or_else(|| EventKind::Unknown(envelope.tag.clone())),
            other => EventKind::Unknown(other.to_string()),
        }
    }
}

fn decode<T: DeserializeOwned>(envelope: &RealtimeEnvelope) -> Option<T> {
    match serde_json::from_value(envelope.data.clone()) {
        Ok(payload) => Some(payload),
        Err(e) => {
            debug!(tag = %envelope.tag, "payload does not match known shape: {}", e);
            None
        }
    }
}

/// Payload of a booking update event
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingUpdate {
    pub booking_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tracking_code: Option<String>,
}

/// Payload of a pushed notification
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPush {
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
}

/// Payload of a vehicle GPS report
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePosition {
    pub vehicle_id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub heading: Option<f64>,
}
