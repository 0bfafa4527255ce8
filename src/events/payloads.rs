//! # Domain Event Payloads
//!
//! The three events flowing through the exchange. Field names are camelCase
//! on the wire; the correlation id of each event is the identifier consumers
//! deduplicate on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::routing_keys;
use crate::models::{Booking, EventRecord};

/// A domain event that can be published to the exchange.
pub trait DomainEvent: Serialize {
    /// Event type, doubling as the routing key.
    fn event_type(&self) -> &'static str;

    /// Identifier consumers deduplicate on.
    fn correlation_id(&self) -> String;
}

/// Emitted when a user account is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegistered {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub timestamp: DateTime<Utc>,
}

impl UserRegistered {
    pub fn new(user_id: i64, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            email: email.into(),
            timestamp: Utc::now(),
        }
    }
}

impl DomainEvent for UserRegistered {
    fn event_type(&self) -> &'static str {
        routing_keys::USER_REGISTERED
    }

    fn correlation_id(&self) -> String {
        self.user_id.to_string()
    }
}

/// Emitted when a catalog event is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCreated {
    pub event_id: i64,
    pub event_name: String,
    pub location: String,
    pub event_date: DateTime<Utc>,
    pub capacity: i32,
    pub timestamp: DateTime<Utc>,
}

impl EventCreated {
    pub fn for_record(record: &EventRecord) -> Self {
        Self {
            event_id: record.id,
            event_name: record.name.clone(),
            location: record.location.clone(),
            event_date: record.event_date,
            capacity: record.capacity,
            timestamp: Utc::now(),
        }
    }
}

impl DomainEvent for EventCreated {
    fn event_type(&self) -> &'static str {
        routing_keys::EVENT_CREATED
    }

    fn correlation_id(&self) -> String {
        self.event_id.to_string()
    }
}

/// Emitted after a booking saga lands in CONFIRMED. Never emitted for
/// FAILED bookings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmed {
    pub booking_id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub number_of_tickets: i32,
    pub timestamp: DateTime<Utc>,
}

impl BookingConfirmed {
    pub fn for_booking(booking: &Booking) -> Self {
        Self {
            booking_id: booking.id,
            user_id: booking.user_id,
            event_id: booking.event_id,
            number_of_tickets: booking.number_of_tickets,
            timestamp: Utc::now(),
        }
    }
}

impl DomainEvent for BookingConfirmed {
    fn event_type(&self) -> &'static str {
        routing_keys::BOOKING_SUCCEEDED
    }

    fn correlation_id(&self) -> String {
        self.booking_id.to_string()
    }
}
