//! # Transactional Outbox Entries
//!
//! When the orchestrator runs in outbox mode, a confirmed booking's event is
//! not published inline. Instead an entry is staged in the booking ledger's
//! own critical section, so the CONFIRMED write and the event payload commit
//! or vanish together. A relay later drains unpublished entries to the
//! broker and retries until each one lands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::events::DomainEvent;
use crate::messaging::BrokerMessage;

/// A domain event staged for publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxEntry {
    pub id: Uuid,
    /// Event type, doubling as the routing key
    pub event_type: String,
    pub payload: Value,
    pub correlation_id: String,
    pub created_at: DateTime<Utc>,
    /// Set once the relay has successfully published the entry
    pub published_at: Option<DateTime<Utc>>,
}

impl OutboxEntry {
    pub fn new(
        event_type: impl Into<String>,
        payload: Value,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type: event_type.into(),
            payload,
            correlation_id: correlation_id.into(),
            created_at: Utc::now(),
            published_at: None,
        }
    }

    /// Stage a domain event.
    pub fn for_event<E: DomainEvent>(event: &E) -> Result<Self, serde_json::Error> {
        Ok(Self::new(
            event.event_type(),
            serde_json::to_value(event)?,
            event.correlation_id(),
        ))
    }

    pub fn is_published(&self) -> bool {
        self.published_at.is_some()
    }

    /// Rebuild the broker envelope, preserving the original emission time.
    pub fn to_message(&self) -> BrokerMessage {
        BrokerMessage::with_emitted_at(
            self.event_type.clone(),
            self.payload.clone(),
            self.correlation_id.clone(),
            self.created_at,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::BookingConfirmed;

    #[test]
    fn test_entry_starts_unpublished() {
        let entry = OutboxEntry::new("booking.succeeded", serde_json::json!({"bookingId": 1}), "1");
        assert!(!entry.is_published());
        assert_eq!(entry.event_type, "booking.succeeded");
    }

    #[test]
    fn test_for_event_carries_routing_and_correlation() {
        let event = BookingConfirmed {
            booking_id: 42,
            user_id: 7,
            event_id: 11,
            number_of_tickets: 3,
            timestamp: Utc::now(),
        };
        let entry = OutboxEntry::for_event(&event).unwrap();
        assert_eq!(entry.event_type, "booking.succeeded");
        assert_eq!(entry.correlation_id, "42");
        assert_eq!(entry.payload["numberOfTickets"], 3);

        let message = entry.to_message();
        assert_eq!(message.message_type, "booking.succeeded");
        assert_eq!(message.metadata.emitted_at, entry.created_at);
    }
}
