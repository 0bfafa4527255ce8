//! # In-Process Event Broker
//!
//! Topic exchange plus durable queues with at-least-once delivery. Messages
//! stay in their queue until explicitly acknowledged: a read only stamps a
//! visibility timeout, so a consumer crash before ack makes the message
//! reappear, in its original position, once the timeout lapses.
//!
//! Routing follows AMQP topic conventions: patterns are dot-separated, `*`
//! matches exactly one segment and `#` matches zero or more.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::errors::{MessagingError, MessagingResult};
use super::message::{BrokerMessage, DeliveredMessage};

/// A queued envelope together with its delivery state.
#[derive(Debug, Clone)]
struct QueuedMessage {
    msg_id: i64,
    read_count: u32,
    visible_at: Instant,
    message: BrokerMessage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Binding {
    pattern: String,
    queue_name: String,
}

#[derive(Debug, Default)]
struct ExchangeState {
    bindings: Mutex<Vec<Binding>>,
}

#[derive(Debug, Default)]
struct QueueState {
    next_msg_id: AtomicI64,
    messages: Mutex<VecDeque<QueuedMessage>>,
    archive: Mutex<Vec<QueuedMessage>>,
}

/// In-process topic broker.
///
/// All operations are short critical sections over per-queue locks, so the
/// broker can be shared freely across tasks behind an `Arc`.
#[derive(Debug, Default)]
pub struct EventBroker {
    exchanges: DashMap<String, ExchangeState>,
    queues: DashMap<String, QueueState>,
}

impl EventBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an exchange if it doesn't exist.
    pub fn declare_exchange(&self, exchange: &str) {
        debug!("📋 Declaring exchange: {}", exchange);
        self.exchanges
            .entry(exchange.to_string())
            .or_insert_with(ExchangeState::default);
    }

    /// Declare a queue if it doesn't exist.
    pub fn declare_queue(&self, queue_name: &str) {
        debug!("📋 Declaring queue: {}", queue_name);
        self.queues
            .entry(queue_name.to_string())
            .or_insert_with(QueueState::default);
    }

    /// Bind a queue to an exchange under a routing pattern.
    ///
    /// Re-binding with an identical pattern is a no-op, so topology setup is
    /// safe to repeat.
    pub fn bind_queue(
        &self,
        queue_name: &str,
        exchange: &str,
        routing_pattern: &str,
    ) -> MessagingResult<()> {
        if !self.queues.contains_key(queue_name) {
            return Err(MessagingError::queue_not_found(queue_name));
        }
        let exchange_state = self
            .exchanges
            .get(exchange)
            .ok_or_else(|| MessagingError::exchange_not_found(exchange))?;

        let binding = Binding {
            pattern: routing_pattern.to_string(),
            queue_name: queue_name.to_string(),
        };
        let mut bindings = exchange_state.bindings.lock();
        if !bindings.contains(&binding) {
            bindings.push(binding);
            debug!(
                "🔗 Bound queue {} to exchange {} with pattern: {}",
                queue_name, exchange, routing_pattern
            );
        }
        Ok(())
    }

    /// Publish a message to every queue whose binding matches `routing_key`.
    ///
    /// Returns the number of queues the message landed in. Zero matches is
    /// not an error; the event is simply dropped, with a warning.
    pub fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        message: BrokerMessage,
    ) -> MessagingResult<usize> {
        debug!("📤 Publishing {} to exchange: {}", routing_key, exchange);

        let targets: Vec<String> = {
            let exchange_state = self
                .exchanges
                .get(exchange)
                .ok_or_else(|| MessagingError::exchange_not_found(exchange))?;
            let bindings = exchange_state.bindings.lock();
            let mut matched = Vec::new();
            for binding in bindings.iter() {
                if routing_key_matches(&binding.pattern, routing_key)
                    && !matched.contains(&binding.queue_name)
                {
                    matched.push(binding.queue_name.clone());
                }
            }
            matched
        };

        if targets.is_empty() {
            warn!(
                "⚠️ No queue bound for routing key {} on exchange {}",
                routing_key, exchange
            );
            return Ok(0);
        }

        for queue_name in &targets {
            let queue = self
                .queues
                .get(queue_name)
                .ok_or_else(|| MessagingError::queue_not_found(queue_name))?;
            let msg_id = queue.next_msg_id.fetch_add(1, Ordering::SeqCst) + 1;
            queue.messages.lock().push_back(QueuedMessage {
                msg_id,
                read_count: 0,
                visible_at: Instant::now(),
                message: message.clone(),
            });
        }

        info!(
            "✅ Published {} to {} queue(s)",
            routing_key,
            targets.len()
        );
        Ok(targets.len())
    }

    /// Read up to `limit` visible messages, making each invisible for `vt`.
    ///
    /// Messages are not removed: an unacknowledged read reappears after the
    /// visibility timeout, in its original queue position.
    pub fn read_messages(
        &self,
        queue_name: &str,
        vt: Duration,
        limit: usize,
    ) -> MessagingResult<Vec<DeliveredMessage>> {
        let queue = self
            .queues
            .get(queue_name)
            .ok_or_else(|| MessagingError::queue_not_found(queue_name))?;

        let now = Instant::now();
        let mut delivered = Vec::new();
        let mut messages = queue.messages.lock();
        for queued in messages.iter_mut() {
            if delivered.len() >= limit {
                break;
            }
            if queued.visible_at > now {
                continue;
            }
            queued.read_count += 1;
            queued.visible_at = now + vt;
            delivered.push(DeliveredMessage {
                msg_id: queued.msg_id,
                read_count: queued.read_count,
                message: queued.message.clone(),
            });
        }
        drop(messages);

        if !delivered.is_empty() {
            debug!(
                "📨 Read {} message(s) from queue: {}",
                delivered.len(),
                queue_name
            );
        }
        Ok(delivered)
    }

    /// Acknowledge a message, deleting it from the queue.
    pub fn ack_message(&self, queue_name: &str, msg_id: i64) -> MessagingResult<()> {
        debug!("🗑️ Acking message {} from queue: {}", msg_id, queue_name);
        let queue = self
            .queues
            .get(queue_name)
            .ok_or_else(|| MessagingError::queue_not_found(queue_name))?;

        let mut messages = queue.messages.lock();
        let before = messages.len();
        messages.retain(|queued| queued.msg_id != msg_id);
        if messages.len() == before {
            return Err(MessagingError::message_not_found(queue_name, msg_id));
        }
        Ok(())
    }

    /// Negative-acknowledge a message, making it immediately visible again.
    pub fn nack_message(&self, queue_name: &str, msg_id: i64) -> MessagingResult<()> {
        debug!("↩️ Nacking message {} on queue: {}", msg_id, queue_name);
        let queue = self
            .queues
            .get(queue_name)
            .ok_or_else(|| MessagingError::queue_not_found(queue_name))?;

        let mut messages = queue.messages.lock();
        let queued = messages
            .iter_mut()
            .find(|queued| queued.msg_id == msg_id)
            .ok_or_else(|| MessagingError::message_not_found(queue_name, msg_id))?;
        queued.visible_at = Instant::now();
        Ok(())
    }

    /// Move a message to the queue's dead-letter archive.
    pub fn archive_message(&self, queue_name: &str, msg_id: i64) -> MessagingResult<()> {
        debug!(
            "📦 Archiving message {} from queue: {}",
            msg_id, queue_name
        );
        let queue = self
            .queues
            .get(queue_name)
            .ok_or_else(|| MessagingError::queue_not_found(queue_name))?;

        let mut messages = queue.messages.lock();
        let position = messages
            .iter()
            .position(|queued| queued.msg_id == msg_id)
            .ok_or_else(|| MessagingError::message_not_found(queue_name, msg_id))?;
        let queued = messages
            .remove(position)
            .ok_or_else(|| MessagingError::message_not_found(queue_name, msg_id))?;
        drop(messages);

        queue.archive.lock().push(queued);
        warn!("📦 Message {} archived from queue: {}", msg_id, queue_name);
        Ok(())
    }

    /// Delete all pending messages from a queue, returning how many.
    pub fn purge_queue(&self, queue_name: &str) -> MessagingResult<u64> {
        warn!("🧹 Purging queue: {}", queue_name);
        let queue = self
            .queues
            .get(queue_name)
            .ok_or_else(|| MessagingError::queue_not_found(queue_name))?;

        let mut messages = queue.messages.lock();
        let purged_count = messages.len() as u64;
        messages.clear();
        Ok(purged_count)
    }

    /// Number of messages in the queue, visible or not.
    pub fn queue_depth(&self, queue_name: &str) -> MessagingResult<usize> {
        let queue = self
            .queues
            .get(queue_name)
            .ok_or_else(|| MessagingError::queue_not_found(queue_name))?;
        let depth = queue.messages.lock().len();
        Ok(depth)
    }

    /// Snapshot of dead-lettered envelopes for a queue.
    pub fn archived_messages(&self, queue_name: &str) -> MessagingResult<Vec<BrokerMessage>> {
        let queue = self
            .queues
            .get(queue_name)
            .ok_or_else(|| MessagingError::queue_not_found(queue_name))?;
        let archived = queue
            .archive
            .lock()
            .iter()
            .map(|queued| queued.message.clone())
            .collect();
        Ok(archived)
    }

    /// Depth of every declared queue, for health reporting.
    pub fn queue_depths(&self) -> Vec<(String, usize)> {
        let mut depths: Vec<(String, usize)> = self
            .queues
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().messages.lock().len()))
            .collect();
        depths.sort();
        depths
    }
}

/// AMQP-style topic match: `*` is one segment, `#` is zero or more.
fn routing_key_matches(pattern: &str, routing_key: &str) -> bool {
    let pattern: Vec<&str> = pattern.split('.').collect();
    let key: Vec<&str> = routing_key.split('.').collect();
    segments_match(&pattern, &key)
}

fn segments_match(pattern: &[&str], key: &[&str]) -> bool {
    match (pattern.first(), key.first()) {
        (None, None) => true,
        (Some(&"#"), _) => {
            // '#' absorbs zero segments, or one and stays in play
            segments_match(&pattern[1..], key)
                || (!key.is_empty() && segments_match(pattern, &key[1..]))
        }
        (Some(&"*"), Some(_)) => segments_match(&pattern[1..], &key[1..]),
        (Some(p), Some(k)) => p == k && segments_match(&pattern[1..], &key[1..]),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_message(correlation_id: &str) -> BrokerMessage {
        BrokerMessage::new(
            "booking.succeeded",
            json!({"bookingId": 42}),
            correlation_id,
        )
    }

    fn broker_with_queue(queue: &str, pattern: &str) -> EventBroker {
        let broker = EventBroker::new();
        broker.declare_exchange("test.exchange");
        broker.declare_queue(queue);
        broker.bind_queue(queue, "test.exchange", pattern).unwrap();
        broker
    }

    #[test]
    fn test_routing_key_matching() {
        assert!(routing_key_matches("booking.succeeded", "booking.succeeded"));
        assert!(routing_key_matches("booking.*", "booking.succeeded"));
        assert!(routing_key_matches("#", "booking.succeeded"));
        assert!(routing_key_matches("booking.#", "booking.succeeded"));
        assert!(routing_key_matches("booking.#", "booking"));
        assert!(routing_key_matches("#.succeeded", "booking.succeeded"));

        assert!(!routing_key_matches("booking.succeeded", "booking.failed"));
        assert!(!routing_key_matches("booking.*", "booking.succeeded.extra"));
        assert!(!routing_key_matches("booking.*", "booking"));
        assert!(!routing_key_matches("user.*", "booking.succeeded"));
    }

    #[test]
    fn test_publish_read_ack_flow() {
        let broker = broker_with_queue("test.queue", "booking.succeeded");

        let delivered_to = broker
            .publish("test.exchange", "booking.succeeded", sample_message("42"))
            .unwrap();
        assert_eq!(delivered_to, 1);
        assert_eq!(broker.queue_depth("test.queue").unwrap(), 1);

        let batch = broker
            .read_messages("test.queue", Duration::from_secs(30), 10)
            .unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].read_count, 1);
        assert_eq!(batch[0].message.metadata.correlation_id, "42");

        // Invisible until the timeout lapses
        let empty = broker
            .read_messages("test.queue", Duration::from_secs(30), 10)
            .unwrap();
        assert!(empty.is_empty());

        broker.ack_message("test.queue", batch[0].msg_id).unwrap();
        assert_eq!(broker.queue_depth("test.queue").unwrap(), 0);
    }

    #[test]
    fn test_unacked_message_reappears_in_order() {
        let broker = broker_with_queue("test.queue", "booking.succeeded");
        broker
            .publish("test.exchange", "booking.succeeded", sample_message("1"))
            .unwrap();
        broker
            .publish("test.exchange", "booking.succeeded", sample_message("2"))
            .unwrap();

        let first_pass = broker
            .read_messages("test.queue", Duration::from_millis(5), 10)
            .unwrap();
        assert_eq!(first_pass.len(), 2);

        std::thread::sleep(Duration::from_millis(20));

        let second_pass = broker
            .read_messages("test.queue", Duration::from_secs(30), 10)
            .unwrap();
        assert_eq!(second_pass.len(), 2);
        assert_eq!(second_pass[0].message.metadata.correlation_id, "1");
        assert_eq!(second_pass[1].message.metadata.correlation_id, "2");
        assert_eq!(second_pass[0].read_count, 2);
    }

    #[test]
    fn test_nack_restores_visibility_immediately() {
        let broker = broker_with_queue("test.queue", "booking.succeeded");
        broker
            .publish("test.exchange", "booking.succeeded", sample_message("42"))
            .unwrap();

        let batch = broker
            .read_messages("test.queue", Duration::from_secs(30), 10)
            .unwrap();
        broker.nack_message("test.queue", batch[0].msg_id).unwrap();

        let redelivered = broker
            .read_messages("test.queue", Duration::from_secs(30), 10)
            .unwrap();
        assert_eq!(redelivered.len(), 1);
        assert_eq!(redelivered[0].read_count, 2);
    }

    #[test]
    fn test_archive_parks_message() {
        let broker = broker_with_queue("test.queue", "booking.succeeded");
        broker
            .publish("test.exchange", "booking.succeeded", sample_message("42"))
            .unwrap();

        let batch = broker
            .read_messages("test.queue", Duration::from_secs(30), 10)
            .unwrap();
        broker
            .archive_message("test.queue", batch[0].msg_id)
            .unwrap();

        assert_eq!(broker.queue_depth("test.queue").unwrap(), 0);
        let archived = broker.archived_messages("test.queue").unwrap();
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].metadata.correlation_id, "42");
    }

    #[test]
    fn test_fan_out_to_multiple_queues() {
        let broker = EventBroker::new();
        broker.declare_exchange("test.exchange");
        broker.declare_queue("notification.queue");
        broker.declare_queue("audit.queue");
        broker
            .bind_queue("notification.queue", "test.exchange", "booking.succeeded")
            .unwrap();
        broker
            .bind_queue("audit.queue", "test.exchange", "#")
            .unwrap();

        let delivered_to = broker
            .publish("test.exchange", "booking.succeeded", sample_message("42"))
            .unwrap();
        assert_eq!(delivered_to, 2);
        assert_eq!(broker.queue_depth("notification.queue").unwrap(), 1);
        assert_eq!(broker.queue_depth("audit.queue").unwrap(), 1);
    }

    #[test]
    fn test_duplicate_binding_delivers_once() {
        let broker = broker_with_queue("test.queue", "booking.succeeded");
        broker
            .bind_queue("test.queue", "test.exchange", "booking.succeeded")
            .unwrap();

        broker
            .publish("test.exchange", "booking.succeeded", sample_message("42"))
            .unwrap();
        assert_eq!(broker.queue_depth("test.queue").unwrap(), 1);
    }

    #[test]
    fn test_publish_to_missing_exchange_fails() {
        let broker = EventBroker::new();
        let result = broker.publish("ghost.exchange", "booking.succeeded", sample_message("42"));
        assert!(matches!(
            result,
            Err(MessagingError::ExchangeNotFound { .. })
        ));
    }

    #[test]
    fn test_unmatched_routing_key_drops_message() {
        let broker = broker_with_queue("test.queue", "user.registered");
        let delivered_to = broker
            .publish("test.exchange", "booking.succeeded", sample_message("42"))
            .unwrap();
        assert_eq!(delivered_to, 0);
        assert_eq!(broker.queue_depth("test.queue").unwrap(), 0);
    }
}
