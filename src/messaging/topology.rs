//! # Broker Topology
//!
//! Declarative layout of the exchange, queues, and bindings. Handlers and
//! workers receive the topology instead of hard-coding queue names, so tests
//! can stand up an isolated broker and alternate layouts stay possible.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use super::broker::EventBroker;
use super::errors::MessagingResult;
use crate::constants::{routing_keys, system};

/// Consumer groups. Each group owns one queue per subscribed routing key, so
/// groups consume independently and a slow group never starves another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumerGroup {
    Ticketing,
    Notification,
    Audit,
}

impl ConsumerGroup {
    pub const ALL: [ConsumerGroup; 3] = [
        ConsumerGroup::Ticketing,
        ConsumerGroup::Notification,
        ConsumerGroup::Audit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsumerGroup::Ticketing => "ticketing",
            ConsumerGroup::Notification => "notification",
            ConsumerGroup::Audit => "audit",
        }
    }

    /// Routing keys this group subscribes to.
    pub fn subscriptions(&self) -> &'static [&'static str] {
        match self {
            ConsumerGroup::Ticketing => &[routing_keys::BOOKING_SUCCEEDED],
            ConsumerGroup::Notification | ConsumerGroup::Audit => &[
                routing_keys::USER_REGISTERED,
                routing_keys::EVENT_CREATED,
                routing_keys::BOOKING_SUCCEEDED,
            ],
        }
    }
}

impl fmt::Display for ConsumerGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Exchange, queue, and binding layout for the booking system.
#[derive(Debug, Clone)]
pub struct BrokerTopology {
    exchange: String,
}

impl Default for BrokerTopology {
    fn default() -> Self {
        Self::new(system::DEFAULT_EXCHANGE)
    }
}

impl BrokerTopology {
    pub fn new(exchange: impl Into<String>) -> Self {
        Self {
            exchange: exchange.into(),
        }
    }

    /// Name of the topic exchange all domain events are published to.
    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    /// Queue name for a (group, routing key) pair:
    /// `{group}.{routing_key}.queue`.
    pub fn queue_name(group: ConsumerGroup, routing_key: &str) -> String {
        format!("{}.{}.queue", group.as_str(), routing_key)
    }

    /// All queue names owned by a consumer group.
    pub fn queues_for(&self, group: ConsumerGroup) -> Vec<String> {
        group
            .subscriptions()
            .iter()
            .map(|routing_key| Self::queue_name(group, routing_key))
            .collect()
    }

    /// Declare the exchange and every group queue, then bind each queue to
    /// its routing key. Idempotent.
    pub fn declare_all(&self, broker: &EventBroker) -> MessagingResult<()> {
        broker.declare_exchange(&self.exchange);

        let mut queue_count = 0;
        for group in ConsumerGroup::ALL {
            for routing_key in group.subscriptions() {
                let queue_name = Self::queue_name(group, routing_key);
                broker.declare_queue(&queue_name);
                broker.bind_queue(&queue_name, &self.exchange, routing_key)?;
                queue_count += 1;
            }
        }

        info!(
            exchange = %self.exchange,
            queues = queue_count,
            "🗺️ Broker topology declared"
        );
        Ok(())
    }
}
