//! # Outbox Relay
//!
//! Background pump that moves staged outbox entries from the booking
//! ledger onto the broker. Entries are only marked published after the
//! broker accepts them, so a crash mid-batch re-delivers rather than
//! drops; consumers deduplicate the repeats by correlation id.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::constants::system;
use crate::events::EventPublisher;
use crate::ledger::BookingLedger;

/// Tuning for the relay loop.
#[derive(Debug, Clone)]
pub struct OutboxRelayConfig {
    /// How often the relay wakes to look for unpublished entries.
    pub poll_interval: Duration,
    /// Maximum entries drained per wakeup.
    pub batch_size: usize,
}

impl Default for OutboxRelayConfig {
    fn default() -> Self {
        Self {
            poll_interval: system::DEFAULT_OUTBOX_POLL_INTERVAL,
            batch_size: system::DEFAULT_OUTBOX_BATCH_SIZE,
        }
    }
}

/// Publishes committed-but-unpublished booking events.
#[derive(Clone)]
pub struct OutboxRelay {
    ledger: Arc<BookingLedger>,
    publisher: EventPublisher,
    config: OutboxRelayConfig,
}

impl OutboxRelay {
    pub fn new(
        ledger: Arc<BookingLedger>,
        publisher: EventPublisher,
        config: OutboxRelayConfig,
    ) -> Self {
        Self {
            ledger,
            publisher,
            config,
        }
    }

    /// Drain one batch: publish every claimed entry, then mark the ones the
    /// broker accepted. Entries whose publish fails stay unpublished and are
    /// claimed again on a later pass.
    pub fn drain_once(&self) -> usize {
        let claimed = self.ledger.claim_unpublished(self.config.batch_size);
        if claimed.is_empty() {
            return 0;
        }
        debug!(claimed = claimed.len(), "📮 Draining outbox batch");

        let mut published: Vec<Uuid> = Vec::with_capacity(claimed.len());
        for entry in &claimed {
            match self
                .publisher
                .publish_message(&entry.event_type, entry.to_message())
            {
                Ok(_) => published.push(entry.id),
                Err(err) => {
                    warn!(
                        outbox_id = %entry.id,
                        event_type = %entry.event_type,
                        error = %err,
                        "⚠️ Outbox publish failed; entry will be retried"
                    );
                }
            }
        }

        let marked = self.ledger.mark_published(&published);
        if marked > 0 {
            info!(published = marked, "📮 Outbox entries relayed to broker");
        }
        marked
    }

    /// Run the relay until the process exits.
    pub fn spawn(self) -> JoinHandle<()> {
        info!(
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            batch_size = self.config.batch_size,
            "🚀 Outbox relay started"
        );
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.config.poll_interval);
            loop {
                ticker.tick().await;
                self.drain_once();
            }
        })
    }
}
