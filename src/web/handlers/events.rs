//! # Event Catalog Handlers
//!
//! Creation, lifecycle, and the seat-reservation endpoint the booking
//! service consumes across the wire.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::{info, warn};

use crate::events::EventCreated;
use crate::models::{EventRequest, EventResponse};
use crate::web::response_types::ApiResult;
use crate::web::state::AppState;

/// Create a catalog event: POST /events
///
/// The record commits first; the EventCreated publish follows and a failure
/// there leaves the record standing.
pub async fn create_event(
    State(state): State<AppState>,
    Json(request): Json<EventRequest>,
) -> ApiResult<(StatusCode, Json<EventResponse>)> {
    info!(
        name = %request.name,
        location = %request.location,
        capacity = request.capacity,
        "Creating catalog event via web API"
    );

    let record = state.inventory.create_event(request)?;
    let event = EventCreated::for_record(&record);
    if let Err(err) = state.publisher.publish(&event) {
        warn!(
            event_id = record.id,
            error = %err,
            "⚠️ EventCreated publish failed; record stands"
        );
    }
    Ok((StatusCode::CREATED, Json(EventResponse::from(record))))
}

/// Fetch one event: GET /events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> ApiResult<Json<EventResponse>> {
    let record = state.inventory.get_event(event_id)?;
    Ok(Json(EventResponse::from(record)))
}

/// List the catalog: GET /events
pub async fn list_events(State(state): State<AppState>) -> Json<Vec<EventResponse>> {
    let events = state
        .inventory
        .list_events()
        .into_iter()
        .map(EventResponse::from)
        .collect();
    Json(events)
}

/// Open a draft event for sale: POST /events/{id}/publish
pub async fn publish_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> ApiResult<Json<EventResponse>> {
    let record = state.inventory.publish_event(event_id)?;
    info!(event_id = record.id, "Catalog event published");
    Ok(Json(EventResponse::from(record)))
}

/// Query parameters for direct seat reservation.
#[derive(Debug, Deserialize)]
pub struct ReserveQuery {
    pub seats: i32,
}

/// Reserve seats directly: POST /events/{id}/reserve?seats=N
///
/// The cross-service surface behind the orchestrator's reservation client.
/// The body is a bare boolean: `true` reserved, `false` denied.
pub async fn reserve_seats(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Query(query): Query<ReserveQuery>,
) -> ApiResult<Json<bool>> {
    let reserved = state.inventory.reserve_seats(event_id, query.seats)?;
    Ok(Json(reserved))
}
