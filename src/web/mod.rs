//! # HTTP Surface
//!
//! Axum wiring for the booking API: shared state, error conversions, and
//! the route table. Handlers stay thin; everything stateful lives behind
//! [`AppState`].

pub mod handlers;
pub mod response_types;
pub mod state;

pub use response_types::{ApiError, ApiResult};
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;

/// Build the full API router over the shared state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/bookings",
            post(handlers::bookings::create_booking).get(handlers::bookings::list_bookings),
        )
        .route(
            "/bookings/user/:user_id",
            get(handlers::bookings::bookings_for_user),
        )
        .route("/bookings/:id", get(handlers::bookings::get_booking))
        .route(
            "/events",
            post(handlers::events::create_event).get(handlers::events::list_events),
        )
        .route("/events/:id", get(handlers::events::get_event))
        .route("/events/:id/publish", post(handlers::events::publish_event))
        .route("/events/:id/reserve", post(handlers::events::reserve_seats))
        .route(
            "/tickets/booking/:booking_id",
            get(handlers::tickets::tickets_for_booking),
        )
        .route(
            "/tickets/user/:user_id",
            get(handlers::tickets::tickets_for_user),
        )
        .route(
            "/tickets/:ticket_number",
            get(handlers::tickets::get_ticket),
        )
        .with_state(state)
}
