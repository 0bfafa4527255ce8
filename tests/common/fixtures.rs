//! Shared saga stack for the integration suites.
//!
//! [`SagaFixture`] wires the whole system in process: a declared broker
//! topology, the seat inventory, the booking ledger, the three consumer
//! stores, and an orchestrator in front of them. Consumer workers are held
//! rather than spawned so each test controls exactly when deliveries settle.

#![allow(dead_code)] // Each test binary uses its own slice of the fixture

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use chrono::Utc;

use helabooking_core::consumers::{
    AuditLogStore, AuditRecorder, ConsumerWorker, EventConsumer, NotificationDispatcher,
    NotificationStore, TicketIssuer, TicketStore, WorkerConfig,
};
use helabooking_core::events::EventPublisher;
use helabooking_core::inventory::InventoryStore;
use helabooking_core::ledger::BookingLedger;
use helabooking_core::messaging::{BrokerTopology, ConsumerGroup, EventBroker};
use helabooking_core::models::{Booking, BookingRequest, EventRecord, EventRequest};
use helabooking_core::orchestration::{
    BookingOrchestrator, InProcessReservationClient, OutboxRelay, OutboxRelayConfig, PublishMode,
};
use helabooking_core::resilience::{CircuitBreaker, CircuitBreakerConfig};
use helabooking_core::web::{self, AppState};

pub const TEST_EXCHANGE: &str = "helabooking.test.exchange";

/// Full in-process booking stack with workers driven by hand.
pub struct SagaFixture {
    pub broker: Arc<EventBroker>,
    pub topology: BrokerTopology,
    pub inventory: Arc<InventoryStore>,
    pub ledger: Arc<BookingLedger>,
    pub publisher: EventPublisher,
    pub orchestrator: Arc<BookingOrchestrator>,
    pub tickets: Arc<TicketStore>,
    pub notifications: Arc<NotificationStore>,
    pub audit: Arc<AuditLogStore>,
    workers: Vec<ConsumerWorker>,
}

impl SagaFixture {
    /// Direct-publish stack with a declared topology, a lenient breaker,
    /// and a generous reservation timeout.
    pub fn new() -> Self {
        Self::with_mode(PublishMode::Direct)
    }

    pub fn with_mode(mode: PublishMode) -> Self {
        Self::build(mode, true)
    }

    /// Stack whose exchange was never declared, for broker-outage tests.
    /// Workers must not be polled until the topology is declared.
    pub fn with_undeclared_exchange(mode: PublishMode) -> Self {
        Self::build(mode, false)
    }

    fn build(mode: PublishMode, declare_topology: bool) -> Self {
        let broker = Arc::new(EventBroker::new());
        let topology = BrokerTopology::new(TEST_EXCHANGE);
        if declare_topology {
            topology
                .declare_all(&broker)
                .expect("declaring onto a fresh broker cannot fail");
        }

        let inventory = Arc::new(InventoryStore::new());
        let ledger = Arc::new(BookingLedger::new());
        let publisher = EventPublisher::new(Arc::clone(&broker), topology.clone());

        let breaker = Arc::new(CircuitBreaker::new(
            "seat-reservation",
            CircuitBreakerConfig {
                failure_threshold: 100,
                timeout: Duration::from_secs(30),
                success_threshold: 1,
            },
        ));
        let reservations = Arc::new(InProcessReservationClient::new(Arc::clone(&inventory)));
        let orchestrator = Arc::new(BookingOrchestrator::new(
            Arc::clone(&ledger),
            reservations,
            publisher.clone(),
            breaker,
            Duration::from_millis(500),
            mode,
        ));

        let tickets = Arc::new(TicketStore::new());
        let notifications = Arc::new(NotificationStore::new());
        let audit = Arc::new(AuditLogStore::new());

        let ticket_issuer: Arc<dyn EventConsumer> =
            Arc::new(TicketIssuer::new(Arc::clone(&tickets)));
        let dispatcher: Arc<dyn EventConsumer> =
            Arc::new(NotificationDispatcher::new(Arc::clone(&notifications)));
        let recorder: Arc<dyn EventConsumer> = Arc::new(AuditRecorder::new(Arc::clone(&audit)));

        let mut workers = Vec::new();
        for group in ConsumerGroup::ALL {
            let consumer = match group {
                ConsumerGroup::Ticketing => Arc::clone(&ticket_issuer),
                ConsumerGroup::Notification => Arc::clone(&dispatcher),
                ConsumerGroup::Audit => Arc::clone(&recorder),
            };
            for queue_name in topology.queues_for(group) {
                workers.push(ConsumerWorker::new(
                    Arc::clone(&broker),
                    queue_name,
                    Arc::clone(&consumer),
                    WorkerConfig::default(),
                ));
            }
        }

        Self {
            broker,
            topology,
            inventory,
            ledger,
            publisher,
            orchestrator,
            tickets,
            notifications,
            audit,
            workers,
        }
    }

    /// Seed one catalog event a month out, every seat available.
    pub fn seed_event(&self, capacity: i32) -> EventRecord {
        self.inventory
            .create_event(EventRequest::new(
                "Galle Music Festival",
                "Colombo",
                Utc::now() + chrono::Duration::days(30),
                capacity,
            ))
            .expect("capacity is positive")
    }

    /// Run the booking saga and return the settled booking.
    pub async fn book(&self, user_id: i64, event_id: i64, seats: i32) -> Booking {
        self.orchestrator
            .create_booking(BookingRequest::new(user_id, event_id, seats))
            .await
            .expect("saga settles every valid request")
    }

    /// Poll every worker through `rounds` passes.
    pub async fn poll_rounds(&self, rounds: usize) {
        for _ in 0..rounds {
            for worker in &self.workers {
                worker
                    .poll_once()
                    .await
                    .expect("worker queues are declared");
            }
        }
    }

    /// Settle everything currently deliverable. Three passes absorb the
    /// immediate nack-redeliver cycles the suites exercise.
    pub async fn drain_consumers(&self) {
        self.poll_rounds(3).await;
    }

    /// Relay over this fixture's ledger and publisher.
    pub fn relay(&self) -> OutboxRelay {
        self.relay_with(OutboxRelayConfig::default())
    }

    pub fn relay_with(&self, config: OutboxRelayConfig) -> OutboxRelay {
        OutboxRelay::new(Arc::clone(&self.ledger), self.publisher.clone(), config)
    }

    /// Web-layer state over this fixture's stores.
    pub fn app_state(&self) -> AppState {
        AppState {
            orchestrator: Arc::clone(&self.orchestrator),
            inventory: Arc::clone(&self.inventory),
            ledger: Arc::clone(&self.ledger),
            broker: Arc::clone(&self.broker),
            publisher: self.publisher.clone(),
            tickets: Arc::clone(&self.tickets),
            notifications: Arc::clone(&self.notifications),
            audit: Arc::clone(&self.audit),
            started_at: Instant::now(),
        }
    }

    /// Fresh router over the shared state; build one per request since
    /// `oneshot` consumes the service.
    pub fn router(&self) -> Router {
        web::build_router(self.app_state())
    }

    /// Queue name for a (group, routing key) binding.
    pub fn queue(group: ConsumerGroup, routing_key: &str) -> String {
        BrokerTopology::queue_name(group, routing_key)
    }
}
