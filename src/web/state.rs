//! # Web API Application State
//!
//! Shared state for the web API. Handlers see the same in-process stores
//! the consumer workers write, so reads reflect worker progress without any
//! extra plumbing.

use std::sync::Arc;
use std::time::Instant;

use crate::consumers::{AuditLogStore, NotificationStore, TicketStore};
use crate::events::EventPublisher;
use crate::inventory::InventoryStore;
use crate::ledger::BookingLedger;
use crate::messaging::EventBroker;
use crate::orchestration::BookingOrchestrator;

/// Shared application state for the web API
#[derive(Clone)]
pub struct AppState {
    /// Saga entry point for the booking endpoints
    pub orchestrator: Arc<BookingOrchestrator>,

    /// Event catalog and seat counters
    pub inventory: Arc<InventoryStore>,

    /// Booking records and outbox, read-only from the web layer
    pub ledger: Arc<BookingLedger>,

    /// The topic exchange, for health reporting
    pub broker: Arc<EventBroker>,

    /// Publisher for catalog-side events (EventCreated, UserRegistered)
    pub publisher: EventPublisher,

    /// Read models owned by the consumers
    pub tickets: Arc<TicketStore>,
    pub notifications: Arc<NotificationStore>,
    pub audit: Arc<AuditLogStore>,

    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
