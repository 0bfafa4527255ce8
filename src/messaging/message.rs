//! # Message Structures for Broker Queues
//!
//! Defines the envelope every domain event travels in. The payload stays an
//! opaque JSON value so the broker never needs to know about domain types;
//! consumers deconstruct it with [`BrokerMessage::parse_payload`].

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::MessagingResult;

/// Envelope for a domain event published to the exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerMessage {
    /// Event type, doubling as the routing key (e.g. `booking.succeeded`)
    pub message_type: String,
    /// Serialized domain event payload
    pub payload: Value,
    /// Message metadata
    pub metadata: MessageMetadata,
}

/// Metadata for broker messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageMetadata {
    /// Correlation id for idempotent consumption, e.g. the booking id
    pub correlation_id: String,
    /// When the producer emitted the event
    pub emitted_at: DateTime<Utc>,
}

impl BrokerMessage {
    /// Create a new message emitted now.
    pub fn new(
        message_type: impl Into<String>,
        payload: Value,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            message_type: message_type.into(),
            payload,
            metadata: MessageMetadata {
                correlation_id: correlation_id.into(),
                emitted_at: Utc::now(),
            },
        }
    }

    /// Create a message preserving an earlier emission time, used by the
    /// outbox relay so staged events keep their original timestamp.
    pub fn with_emitted_at(
        message_type: impl Into<String>,
        payload: Value,
        correlation_id: impl Into<String>,
        emitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            message_type: message_type.into(),
            payload,
            metadata: MessageMetadata {
                correlation_id: correlation_id.into(),
                emitted_at,
            },
        }
    }

    /// Deserialize the payload into a concrete event type.
    pub fn parse_payload<T: DeserializeOwned>(&self) -> MessagingResult<T> {
        Ok(serde_json::from_value(self.payload.clone())?)
    }

    /// Message age in milliseconds.
    pub fn age_ms(&self) -> i64 {
        Utc::now()
            .signed_duration_since(self.metadata.emitted_at)
            .num_milliseconds()
    }
}

/// A message handed to a consumer, carrying its queue-local delivery state.
///
/// `read_count` starts at 1 on first delivery; the worker uses it to decide
/// when a persistently failing message should be parked in the dead-letter
/// archive instead of being redelivered.
#[derive(Debug, Clone)]
pub struct DeliveredMessage {
    /// Queue-local message id, used for ack/nack
    pub msg_id: i64,
    /// Number of times this message has been delivered
    pub read_count: u32,
    /// The enqueued envelope
    pub message: BrokerMessage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        flag: bool,
    }

    #[test]
    fn test_parse_payload() {
        let message = BrokerMessage::new("booking.succeeded", json!({"flag": true}), "42");
        let parsed: Sample = message.parse_payload().unwrap();
        assert_eq!(parsed, Sample { flag: true });
    }

    #[test]
    fn test_parse_payload_rejects_wrong_shape() {
        let message = BrokerMessage::new("booking.succeeded", json!({"other": 1}), "42");
        let parsed: MessagingResult<Sample> = message.parse_payload();
        assert!(parsed.is_err());
    }

    #[test]
    fn test_envelope_round_trip() {
        let message = BrokerMessage::new("user.registered", json!({"userId": 7}), "7");
        let serialized = serde_json::to_string(&message).unwrap();
        let restored: BrokerMessage = serde_json::from_str(&serialized).unwrap();
        assert_eq!(restored.message_type, "user.registered");
        assert_eq!(restored.metadata.correlation_id, "7");
        assert_eq!(restored.payload, json!({"userId": 7}));
    }
}
