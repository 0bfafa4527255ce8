//! # Booking Saga Orchestration
//!
//! This module owns the write path of the system: the [`BookingOrchestrator`]
//! drives each booking from PENDING to a terminal state around a single
//! protected reservation call, and the [`OutboxRelay`] ships committed
//! confirmation events to the broker when outbox publishing is enabled.
//!
//! ## Architecture
//!
//! ```text
//!   BookingRequest
//!        │
//!        ▼
//!   BookingOrchestrator ──▶ BookingLedger (PENDING)
//!        │
//!        ▼
//!   CircuitBreaker ▶ timeout ▶ ReservationClient ──▶ InventoryStore
//!        │
//!        ├─ reserved ──▶ CONFIRMED ──▶ EventPublisher / outbox
//!        └─ denied / timeout / error ──▶ FAILED (nothing published)
//! ```
//!
//! The reservation boundary is the only place the saga leaves its own
//! process, and it fails closed: any outcome it cannot prove is a success
//! settles the booking as FAILED.

pub mod booking_orchestrator;
pub mod outbox_relay;
pub mod reservation_client;

pub use booking_orchestrator::{BookingOrchestrator, PublishMode};
pub use outbox_relay::{OutboxRelay, OutboxRelayConfig};
pub use reservation_client::{InProcessReservationClient, ReservationClient, ReservationError};
