use std::sync::Arc;

use tracing::debug;

use super::payloads::{DomainEvent, UserRegistered};
use crate::messaging::{BrokerMessage, BrokerTopology, EventBroker, MessagingError};

/// Publisher binding domain events to the topic exchange.
///
/// Thin and clonable: serializes the event, wraps it in a broker envelope
/// carrying the correlation id, and hands it to the exchange under the
/// event's routing key.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    broker: Arc<EventBroker>,
    topology: BrokerTopology,
}

impl EventPublisher {
    pub fn new(broker: Arc<EventBroker>, topology: BrokerTopology) -> Self {
        Self { broker, topology }
    }

    /// Publish a domain event under its own routing key.
    pub fn publish<E: DomainEvent>(&self, event: &E) -> Result<(), PublishError> {
        let payload = serde_json::to_value(event)?;
        let message = BrokerMessage::new(event.event_type(), payload, event.correlation_id());
        self.publish_message(event.event_type(), message)
    }

    /// Publish a pre-built envelope, used by the outbox relay to replay
    /// staged events with their original emission metadata.
    pub fn publish_message(
        &self,
        routing_key: &str,
        message: BrokerMessage,
    ) -> Result<(), PublishError> {
        let delivered_to = self
            .broker
            .publish(self.topology.exchange(), routing_key, message)?;
        debug!(
            routing_key = routing_key,
            queues = delivered_to,
            "📤 Domain event published"
        );
        Ok(())
    }

    /// Hook for the external auth collaborator. Registration itself lives
    /// outside this crate, but its event still flows through the exchange so
    /// the notification and audit bindings for `user.registered` are
    /// exercised end to end.
    pub fn publish_user_registered(
        &self,
        user_id: i64,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<(), PublishError> {
        self.publish(&UserRegistered::new(user_id, username, email))
    }

    pub fn topology(&self) -> &BrokerTopology {
        &self.topology
    }
}

/// Error types for event publishing
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Broker error: {0}")]
    Broker(#[from] MessagingError),
}
