//! # Messaging Error Types
//!
//! Structured error handling for the broker layer using thiserror instead of
//! `Box<dyn Error>` patterns.

use thiserror::Error;

/// Broker and queue error types
#[derive(Error, Debug)]
pub enum MessagingError {
    #[error("Exchange not found: {exchange}")]
    ExchangeNotFound { exchange: String },

    #[error("Queue not found: {queue_name}")]
    QueueNotFound { queue_name: String },

    #[error("Queue operation failed: {queue_name}: {operation}: {message}")]
    QueueOperation {
        queue_name: String,
        operation: String,
        message: String,
    },

    #[error("Message {message_id} not found in queue {queue_name}")]
    MessageNotFound { queue_name: String, message_id: i64 },

    #[error("Message serialization error: {message}")]
    MessageSerialization { message: String },

    #[error("Message deserialization error: {message}")]
    MessageDeserialization { message: String },
}

impl MessagingError {
    /// Create an exchange not found error
    pub fn exchange_not_found(exchange: impl Into<String>) -> Self {
        Self::ExchangeNotFound {
            exchange: exchange.into(),
        }
    }

    /// Create a queue not found error
    pub fn queue_not_found(queue_name: impl Into<String>) -> Self {
        Self::QueueNotFound {
            queue_name: queue_name.into(),
        }
    }

    /// Create a queue operation error
    pub fn queue_operation(
        queue_name: impl Into<String>,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::QueueOperation {
            queue_name: queue_name.into(),
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a message not found error
    pub fn message_not_found(queue_name: impl Into<String>, message_id: i64) -> Self {
        Self::MessageNotFound {
            queue_name: queue_name.into(),
            message_id,
        }
    }

    /// Create a message serialization error
    pub fn message_serialization(message: impl Into<String>) -> Self {
        Self::MessageSerialization {
            message: message.into(),
        }
    }

    /// Create a message deserialization error
    pub fn message_deserialization(message: impl Into<String>) -> Self {
        Self::MessageDeserialization {
            message: message.into(),
        }
    }
}

/// Conversion from serde_json::Error to MessagingError
impl From<serde_json::Error> for MessagingError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() {
            MessagingError::message_deserialization(err.to_string())
        } else {
            MessagingError::message_serialization(err.to_string())
        }
    }
}

/// Result type alias for messaging operations
pub type MessagingResult<T> = Result<T, MessagingError>;
