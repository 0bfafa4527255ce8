//! # Event Consumers
//!
//! Downstream handlers for the events the booking saga and the catalog
//! emit. Each consumer owns an in-memory store for its side effects and an
//! internal deduplication registry keyed on correlation id, because the
//! broker delivers at least once and the same event can arrive repeatedly.
//!
//! Consumers never share a registry. The pairs they deduplicate on are
//! per-consumer facts: `booking.succeeded` for booking 42 must be handled
//! once by ticketing AND once by notifications, not once overall.
//!
//! - [`TicketIssuer`] turns `booking.succeeded` into one ticket per seat
//! - [`NotificationDispatcher`] records outbound mail for all three events
//! - [`AuditRecorder`] appends a trail entry for every event it sees

pub mod audit_recorder;
pub mod dedup;
pub mod notification_dispatcher;
pub mod ticket_issuer;
pub mod worker;

use async_trait::async_trait;
use thiserror::Error;

use crate::messaging::BrokerMessage;

pub use audit_recorder::{AuditLogStore, AuditRecorder};
pub use dedup::DedupRegistry;
pub use notification_dispatcher::{NotificationDispatcher, NotificationStore};
pub use ticket_issuer::{TicketIssuer, TicketStore};
pub use worker::{ConsumerWorker, WorkerConfig};

/// Errors a consumer can raise for a delivery.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConsumerError {
    #[error("Malformed payload for event '{event_type}': {message}")]
    MalformedPayload { event_type: String, message: String },

    #[error("Unsupported event type: '{event_type}'")]
    UnsupportedEventType { event_type: String },
}

impl ConsumerError {
    pub fn malformed(event_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            event_type: event_type.into(),
            message: message.into(),
        }
    }

    pub fn unsupported(event_type: impl Into<String>) -> Self {
        Self::UnsupportedEventType {
            event_type: event_type.into(),
        }
    }
}

/// What a consumer did with a delivery.
///
/// Both outcomes acknowledge the message; `AlreadyProcessed` means the side
/// effect was skipped because an earlier delivery already produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleOutcome {
    Handled,
    AlreadyProcessed,
}

/// One subscriber position on a queue.
///
/// Implementations must be idempotent: redeliveries of the same message are
/// normal under at-least-once delivery, and handling one twice must leave
/// the consumer's store as if it were handled once.
#[async_trait]
pub trait EventConsumer: Send + Sync {
    /// Stable name for logs and worker identity.
    fn name(&self) -> &str;

    /// Process one delivery.
    async fn handle(&self, message: &BrokerMessage) -> Result<HandleOutcome, ConsumerError>;
}
