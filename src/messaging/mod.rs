//! # Messaging Module
//!
//! In-process topic broker for the booking saga: durable queues with
//! visibility-timeout redelivery, AMQP-style routing patterns, and a
//! declarative topology binding one queue per (consumer group, routing key).

pub mod broker;
pub mod errors;
pub mod message;
pub mod topology;

pub use broker::EventBroker;
pub use errors::{MessagingError, MessagingResult};
pub use message::{BrokerMessage, DeliveredMessage, MessageMetadata};
pub use topology::{BrokerTopology, ConsumerGroup};
