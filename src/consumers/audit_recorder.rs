//! # Audit Recorder
//!
//! Appends one trail entry per distinct domain event. The trail is
//! append-only; duplicates are filtered by correlation id, never by
//! comparing entry content.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::info;

use super::{ConsumerError, DedupRegistry, EventConsumer, HandleOutcome};
use crate::constants::routing_keys;
use crate::events::{BookingConfirmed, EventCreated, UserRegistered};
use crate::messaging::BrokerMessage;
use crate::models::AuditEntry;

/// Append-only audit trail.
#[derive(Debug, Default)]
pub struct AuditLogStore {
    entries: RwLock<Vec<AuditEntry>>,
    next_id: AtomicI64,
}

impl AuditLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(
        &self,
        event_type: impl Into<String>,
        action: impl Into<String>,
        details: impl Into<String>,
    ) -> AuditEntry {
        let entry = AuditEntry {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            event_type: event_type.into(),
            action: action.into(),
            details: details.into(),
            recorded_at: Utc::now(),
        };
        self.entries.write().push(entry.clone());
        entry
    }

    pub fn list_all(&self) -> Vec<AuditEntry> {
        self.entries.read().clone()
    }

    pub fn by_event_type(&self, event_type: &str) -> Vec<AuditEntry> {
        self.entries
            .read()
            .iter()
            .filter(|entry| entry.event_type == event_type)
            .cloned()
            .collect()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.read().len()
    }
}

/// Consumer appending an audit line for every event it observes.
pub struct AuditRecorder {
    store: Arc<AuditLogStore>,
    dedup: DedupRegistry,
}

impl AuditRecorder {
    pub fn new(store: Arc<AuditLogStore>) -> Self {
        Self {
            store,
            dedup: DedupRegistry::new(),
        }
    }

    /// Parse and render the trail line without writing, so failures surface
    /// before the delivery is claimed as seen.
    fn render(&self, message: &BrokerMessage) -> Result<(String, String), ConsumerError> {
        match message.message_type.as_str() {
            routing_keys::USER_REGISTERED => {
                let event: UserRegistered = self.parse(message)?;
                Ok((
                    "User Registration".to_string(),
                    format!(
                        "User {} (ID: {}) registered with email {}",
                        event.username, event.user_id, event.email
                    ),
                ))
            }
            routing_keys::EVENT_CREATED => {
                let event: EventCreated = self.parse(message)?;
                Ok((
                    "Event Creation".to_string(),
                    format!(
                        "Event '{}' (ID: {}) created at {} with capacity {}",
                        event.event_name, event.event_id, event.location, event.capacity
                    ),
                ))
            }
            routing_keys::BOOKING_SUCCEEDED => {
                let event: BookingConfirmed = self.parse(message)?;
                Ok((
                    "Booking Success".to_string(),
                    format!(
                        "Booking ID: {} - User {} booked {} ticket(s) for event {}",
                        event.booking_id, event.user_id, event.number_of_tickets, event.event_id
                    ),
                ))
            }
            other => Err(ConsumerError::unsupported(other)),
        }
    }

    fn parse<T: serde::de::DeserializeOwned>(
        &self,
        message: &BrokerMessage,
    ) -> Result<T, ConsumerError> {
        message
            .parse_payload()
            .map_err(|err| ConsumerError::malformed(&message.message_type, err.to_string()))
    }
}

#[async_trait]
impl EventConsumer for AuditRecorder {
    fn name(&self) -> &str {
        "audit-recorder"
    }

    async fn handle(&self, message: &BrokerMessage) -> Result<HandleOutcome, ConsumerError> {
        let (action, details) = self.render(message)?;

        if !self
            .dedup
            .first_seen(&message.metadata.correlation_id, &message.message_type)
        {
            return Ok(HandleOutcome::AlreadyProcessed);
        }

        let entry = self.store.append(&message.message_type, action, details);
        info!(
            event_type = %entry.event_type,
            action = %entry.action,
            "🔒 Audit entry {} recorded",
            entry.id
        );
        Ok(HandleOutcome::Handled)
    }
}
