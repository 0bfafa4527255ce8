//! # Event Catalog Model
//!
//! Bookable events and their seat inventory. `available_seats` is the only
//! mutable quantity and is guarded by the inventory store's per-row lock;
//! `capacity` never changes after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a catalog event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    #[default]
    Draft,
    Published,
    Closed,
}

impl EventStatus {
    /// Whether seats on an event in this status may be reserved.
    pub fn is_reservable(&self) -> bool {
        !matches!(self, EventStatus::Closed)
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventStatus::Draft => "DRAFT",
            EventStatus::Published => "PUBLISHED",
            EventStatus::Closed => "CLOSED",
        };
        write!(f, "{s}")
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DRAFT" => Ok(EventStatus::Draft),
            "PUBLISHED" => Ok(EventStatus::Published),
            "CLOSED" => Ok(EventStatus::Closed),
            _ => Err(format!("Unknown event status: {s}")),
        }
    }
}

/// A bookable event row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub event_date: DateTime<Utc>,
    /// Fixed seat count set at creation.
    pub capacity: i32,
    /// Remaining seats; invariant `0 <= available_seats <= capacity`.
    pub available_seats: i32,
    pub status: EventStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl EventRecord {
    /// Seats already taken from the original capacity.
    pub fn seats_reserved(&self) -> i32 {
        self.capacity - self.available_seats
    }
}

/// Inbound request to create a catalog event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub name: String,
    pub location: String,
    pub event_date: DateTime<Utc>,
    pub capacity: i32,
}

impl EventRequest {
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        event_date: DateTime<Utc>,
        capacity: i32,
    ) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            event_date,
            capacity,
        }
    }
}

/// Wire shape returned by the event endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub event_date: DateTime<Utc>,
    pub capacity: i32,
    pub available_seats: i32,
    pub status: EventStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<EventRecord> for EventResponse {
    fn from(record: EventRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            location: record.location,
            event_date: record.event_date,
            capacity: record.capacity,
            available_seats: record.available_seats,
            status: record.status,
            published_at: record.published_at,
            created_at: record.created_at,
        }
    }
}
