//! Helabooking Server Binary
//!
//! Wires the whole system into one process: configuration, logging, broker
//! topology, the booking orchestrator, one worker per consumer queue, the
//! outbox relay when enabled, and the axum listener.

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use helabooking_core::config::HelabookingConfig;
use helabooking_core::consumers::{
    AuditLogStore, AuditRecorder, ConsumerWorker, EventConsumer, NotificationDispatcher,
    NotificationStore, TicketIssuer, TicketStore,
};
use helabooking_core::events::EventPublisher;
use helabooking_core::inventory::InventoryStore;
use helabooking_core::ledger::BookingLedger;
use helabooking_core::logging::init_structured_logging;
use helabooking_core::messaging::{BrokerTopology, ConsumerGroup, EventBroker};
use helabooking_core::orchestration::{
    BookingOrchestrator, InProcessReservationClient, OutboxRelay, PublishMode,
};
use helabooking_core::resilience::CircuitBreaker;
use helabooking_core::web::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_structured_logging();
    let config = HelabookingConfig::from_env()?;
    info!(
        bind_address = %config.bind_address,
        exchange = %config.exchange,
        publish_mode = %config.publish_mode,
        "Starting helabooking server"
    );

    // Broker and topology
    let broker = Arc::new(EventBroker::new());
    let topology = BrokerTopology::new(&config.exchange);
    topology.declare_all(&broker)?;

    // Stores
    let inventory = Arc::new(InventoryStore::new());
    let ledger = Arc::new(BookingLedger::new());
    let ticket_store = Arc::new(TicketStore::new());
    let notification_store = Arc::new(NotificationStore::new());
    let audit_store = Arc::new(AuditLogStore::new());

    // Saga wiring
    let publisher = EventPublisher::new(Arc::clone(&broker), topology.clone());
    let breaker = Arc::new(CircuitBreaker::new(
        "seat-reservation",
        config.circuit_breaker.clone(),
    ));
    let reservations = Arc::new(InProcessReservationClient::new(Arc::clone(&inventory)));
    let orchestrator = Arc::new(BookingOrchestrator::new(
        Arc::clone(&ledger),
        reservations,
        publisher.clone(),
        breaker,
        config.reservation_timeout,
        config.publish_mode,
    ));

    // One worker per consumer queue
    let ticket_issuer: Arc<dyn EventConsumer> =
        Arc::new(TicketIssuer::new(Arc::clone(&ticket_store)));
    let dispatcher: Arc<dyn EventConsumer> =
        Arc::new(NotificationDispatcher::new(Arc::clone(&notification_store)));
    let recorder: Arc<dyn EventConsumer> = Arc::new(AuditRecorder::new(Arc::clone(&audit_store)));

    for group in ConsumerGroup::ALL {
        let consumer = match group {
            ConsumerGroup::Ticketing => Arc::clone(&ticket_issuer),
            ConsumerGroup::Notification => Arc::clone(&dispatcher),
            ConsumerGroup::Audit => Arc::clone(&recorder),
        };
        for queue_name in topology.queues_for(group) {
            ConsumerWorker::new(
                Arc::clone(&broker),
                queue_name,
                Arc::clone(&consumer),
                config.worker.clone(),
            )
            .spawn();
        }
    }

    if config.publish_mode == PublishMode::Outbox {
        OutboxRelay::new(
            Arc::clone(&ledger),
            publisher.clone(),
            config.outbox_relay.clone(),
        )
        .spawn();
    }

    let state = AppState {
        orchestrator,
        inventory,
        ledger,
        broker,
        publisher,
        tickets: ticket_store,
        notifications: notification_store,
        audit: audit_store,
        started_at: Instant::now(),
    };
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("🚀 helabooking server listening on {}", config.bind_address);
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    info!("helabooking server stopped");
    Ok(())
}
