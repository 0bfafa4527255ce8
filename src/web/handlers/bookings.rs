//! # Booking Handlers
//!
//! HTTP surface for the booking saga. Creation answers 201 whenever the
//! saga ran to a terminal state: a FAILED booking is a settled outcome the
//! caller must inspect, not a server error.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use crate::models::{BookingRequest, BookingResponse};
use crate::web::response_types::ApiResult;
use crate::web::state::AppState;

/// Create a booking: POST /bookings
///
/// Runs the saga end to end before answering. The response carries the
/// terminal status; PENDING is never observable here.
pub async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> ApiResult<(StatusCode, Json<BookingResponse>)> {
    info!(
        user_id = request.user_id,
        event_id = request.event_id,
        tickets = request.number_of_tickets,
        "Creating booking via web API"
    );

    let booking = state.orchestrator.create_booking(request).await?;
    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

/// Fetch one booking: GET /bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<i64>,
) -> ApiResult<Json<BookingResponse>> {
    let booking = state.orchestrator.get_booking(booking_id)?;
    Ok(Json(BookingResponse::from(booking)))
}

/// List bookings for one user: GET /bookings/user/{user_id}
pub async fn bookings_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Json<Vec<BookingResponse>> {
    let bookings = state
        .orchestrator
        .bookings_for_user(user_id)
        .into_iter()
        .map(BookingResponse::from)
        .collect();
    Json(bookings)
}

/// List all bookings: GET /bookings
pub async fn list_bookings(State(state): State<AppState>) -> Json<Vec<BookingResponse>> {
    let bookings = state
        .orchestrator
        .list_bookings()
        .into_iter()
        .map(BookingResponse::from)
        .collect();
    Json(bookings)
}
