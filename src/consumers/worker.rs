//! # Consumer Worker
//!
//! Polling loop binding one consumer to one queue. The worker owns the
//! acknowledge decision: successful and already-processed outcomes ack,
//! failures nack for redelivery, and messages that exhaust their delivery
//! attempts move to the queue's dead-letter archive instead of cycling
//! forever.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::{EventConsumer, HandleOutcome};
use crate::constants::system;
use crate::messaging::{EventBroker, MessagingResult};

/// Tuning for a worker's poll loop.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// How long a read delivery stays invisible before redelivery.
    pub visibility_timeout: Duration,
    /// Pause between polls.
    pub poll_interval: Duration,
    /// Maximum deliveries fetched per poll.
    pub batch_size: usize,
    /// Deliveries a message gets before it is dead-lettered.
    pub max_delivery_attempts: u32,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            visibility_timeout: system::DEFAULT_VISIBILITY_TIMEOUT,
            poll_interval: system::DEFAULT_POLL_INTERVAL,
            batch_size: system::DEFAULT_BATCH_SIZE,
            max_delivery_attempts: system::DEFAULT_MAX_DELIVERY_ATTEMPTS,
        }
    }
}

/// One consumer polling one queue.
pub struct ConsumerWorker {
    broker: Arc<EventBroker>,
    queue_name: String,
    consumer: Arc<dyn EventConsumer>,
    config: WorkerConfig,
}

impl ConsumerWorker {
    pub fn new(
        broker: Arc<EventBroker>,
        queue_name: impl Into<String>,
        consumer: Arc<dyn EventConsumer>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            broker,
            queue_name: queue_name.into(),
            consumer,
            config,
        }
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    /// Fetch and settle one batch. Returns how many deliveries were handled
    /// with effect (duplicates and dead-letters are settled but not counted).
    pub async fn poll_once(&self) -> MessagingResult<usize> {
        let batch = self.broker.read_messages(
            &self.queue_name,
            self.config.visibility_timeout,
            self.config.batch_size,
        )?;

        let mut handled = 0;
        for delivered in batch {
            if delivered.read_count > self.config.max_delivery_attempts {
                warn!(
                    queue = %self.queue_name,
                    msg_id = delivered.msg_id,
                    read_count = delivered.read_count,
                    "🗑️ Delivery attempts exhausted; dead-lettering message"
                );
                self.broker
                    .archive_message(&self.queue_name, delivered.msg_id)?;
                continue;
            }

            match self.consumer.handle(&delivered.message).await {
                Ok(HandleOutcome::Handled) => {
                    self.broker.ack_message(&self.queue_name, delivered.msg_id)?;
                    handled += 1;
                }
                Ok(HandleOutcome::AlreadyProcessed) => {
                    debug!(
                        queue = %self.queue_name,
                        msg_id = delivered.msg_id,
                        "🔁 Duplicate delivery acknowledged without effect"
                    );
                    self.broker.ack_message(&self.queue_name, delivered.msg_id)?;
                }
                Err(err) => {
                    warn!(
                        queue = %self.queue_name,
                        msg_id = delivered.msg_id,
                        consumer = self.consumer.name(),
                        error = %err,
                        "⚠️ Consumer failed; message returns for redelivery"
                    );
                    self.broker
                        .nack_message(&self.queue_name, delivered.msg_id)?;
                }
            }
        }
        Ok(handled)
    }

    /// Run the poll loop until the process exits.
    pub fn spawn(self) -> JoinHandle<()> {
        info!(
            queue = %self.queue_name,
            consumer = self.consumer.name(),
            "🚀 Consumer worker started"
        );
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.config.poll_interval);
            loop {
                ticker.tick().await;
                if let Err(err) = self.poll_once().await {
                    error!(
                        queue = %self.queue_name,
                        error = %err,
                        "⚠️ Worker poll failed"
                    );
                }
            }
        })
    }
}
