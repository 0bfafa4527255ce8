//! # Ticket Read Handlers
//!
//! Read-only queries over the ticket store the issuer populates.

use axum::extract::{Path, State};
use axum::Json;

use crate::models::Ticket;
use crate::web::response_types::{ApiError, ApiResult};
use crate::web::state::AppState;

/// Tickets for one booking: GET /tickets/booking/{booking_id}
pub async fn tickets_for_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<i64>,
) -> Json<Vec<Ticket>> {
    Json(state.tickets.tickets_for_booking(booking_id))
}

/// Tickets for one user: GET /tickets/user/{user_id}
pub async fn tickets_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Json<Vec<Ticket>> {
    Json(state.tickets.tickets_for_user(user_id))
}

/// Look up a ticket by its public number: GET /tickets/{ticket_number}
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(ticket_number): Path<String>,
) -> ApiResult<Json<Ticket>> {
    state
        .tickets
        .find_by_number(&ticket_number)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("ticket {ticket_number}")))
}
