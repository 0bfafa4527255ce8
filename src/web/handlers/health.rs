//! # Health Check Handler
//!
//! Liveness snapshot over the in-process stores.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::web::state::AppState;

/// Basic health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    uptime_seconds: u64,
    components: ComponentCounts,
}

/// Point-in-time size of each store
#[derive(Serialize)]
pub struct ComponentCounts {
    bookings: usize,
    events: usize,
    tickets: usize,
    notifications: usize,
    audit_entries: usize,
    outbox_pending: usize,
    queues: usize,
}

/// Basic health check endpoint: GET /health
///
/// Answers as long as the process is serving; the component counts give a
/// cheap read on whether the consumers are keeping up.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime_seconds: state.uptime_seconds(),
        components: ComponentCounts {
            bookings: state.ledger.booking_count(),
            events: state.inventory.event_count(),
            tickets: state.tickets.ticket_count(),
            notifications: state.notifications.notification_count(),
            audit_entries: state.audit.entry_count(),
            outbox_pending: state.ledger.outbox_depth(),
            queues: state.broker.queue_depths().len(),
        },
    })
}
