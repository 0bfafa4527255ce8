//! # Booking Model
//!
//! The saga subject: one row per booking attempt, carrying its lifecycle
//! status. Monetary amounts are minor units (cents) to keep arithmetic exact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::state_machine::BookingState;

/// Ticket pricing class requested for a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketType {
    #[default]
    Paid,
    Free,
    Vip,
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TicketType::Paid => "PAID",
            TicketType::Free => "FREE",
            TicketType::Vip => "VIP",
        };
        write!(f, "{s}")
    }
}

impl FromStr for TicketType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PAID" => Ok(TicketType::Paid),
            "FREE" => Ok(TicketType::Free),
            "VIP" => Ok(TicketType::Vip),
            _ => Err(format!("Unknown ticket type: {s}")),
        }
    }
}

/// A booking attempt and its saga status.
///
/// `status` is only ever written through the state machine: PENDING at
/// insert, then exactly one transition to CONFIRMED or FAILED before the
/// creating call returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub number_of_tickets: i32,
    pub ticket_type: TicketType,
    /// Unit price in minor units, when the caller supplied one.
    pub price_per_ticket: Option<i64>,
    /// `price_per_ticket * number_of_tickets`, or `None` when unpriced.
    pub total_price: Option<i64>,
    pub status: BookingState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inbound request to create a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub user_id: i64,
    pub event_id: i64,
    pub number_of_tickets: i32,
    #[serde(default)]
    pub ticket_type: Option<TicketType>,
    #[serde(default)]
    pub price_per_ticket: Option<i64>,
}

impl BookingRequest {
    pub fn new(user_id: i64, event_id: i64, number_of_tickets: i32) -> Self {
        Self {
            user_id,
            event_id,
            number_of_tickets,
            ticket_type: None,
            price_per_ticket: None,
        }
    }

    pub fn with_ticket_type(mut self, ticket_type: TicketType) -> Self {
        self.ticket_type = Some(ticket_type);
        self
    }

    pub fn with_price_per_ticket(mut self, cents: i64) -> Self {
        self.price_per_ticket = Some(cents);
        self
    }

    /// Total price in minor units, or `None` when no unit price was supplied.
    pub fn total_price(&self) -> Option<i64> {
        self.price_per_ticket
            .map(|unit| unit * i64::from(self.number_of_tickets))
    }
}

/// Wire shape returned by the booking endpoints. Omits the unit price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub number_of_tickets: i32,
    pub ticket_type: TicketType,
    pub total_price: Option<i64>,
    pub status: BookingState,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            user_id: booking.user_id,
            event_id: booking.event_id,
            number_of_tickets: booking.number_of_tickets,
            ticket_type: booking.ticket_type,
            total_price: booking.total_price,
            status: booking.status,
            created_at: booking.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_price_computation() {
        let request = BookingRequest::new(1, 2, 3).with_price_per_ticket(2_500);
        assert_eq!(request.total_price(), Some(7_500));

        let unpriced = BookingRequest::new(1, 2, 3);
        assert_eq!(unpriced.total_price(), None);
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let json = r#"{"userId": 7, "eventId": 11, "numberOfTickets": 2}"#;
        let request: BookingRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.user_id, 7);
        assert_eq!(request.event_id, 11);
        assert_eq!(request.number_of_tickets, 2);
        assert!(request.ticket_type.is_none());
        assert!(request.price_per_ticket.is_none());
    }

    #[test]
    fn test_ticket_type_round_trip() {
        for (ticket_type, rendered) in [
            (TicketType::Paid, "PAID"),
            (TicketType::Free, "FREE"),
            (TicketType::Vip, "VIP"),
        ] {
            assert_eq!(ticket_type.to_string(), rendered);
            assert_eq!(rendered.parse::<TicketType>().unwrap(), ticket_type);
        }
        assert!("STANDING".parse::<TicketType>().is_err());
    }
}
