#![allow(clippy::doc_markdown)] // Allow technical terms like BookingConfirmed in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Helabooking Core
//!
//! Booking-saga core for a ticket-sales platform: a local booking ledger, a
//! seat-inventory store, an in-process topic exchange with at-least-once
//! delivery, and the idempotent consumers downstream of it.
//!
//! ## Overview
//!
//! The hard problem this crate solves is cross-service consistency without a
//! shared transaction. A booking must never read CONFIRMED unless seats were
//! actually reserved, inventory must never oversell under concurrency, and a
//! confirmed booking must yield exactly its ticket count even though the
//! confirmation event is delivered at least once.
//!
//! ## Architecture
//!
//! The [`orchestration::BookingOrchestrator`] drives each booking from
//! PENDING to a terminal state around one reservation attempt, bounded by a
//! timeout and shielded by a circuit breaker; anything it cannot prove
//! succeeded fails closed. Confirmed bookings publish `booking.succeeded`
//! through the [`messaging::EventBroker`] topic exchange (directly, or via
//! the transactional outbox), fanning out to the ticketing, notification,
//! and audit consumer groups. Every consumer deduplicates on the event's
//! correlation id, so redeliveries are no-ops.
//!
//! ## Module Organization
//!
//! - [`models`] - Bookings, events, tickets, notifications, audit entries
//! - [`state_machine`] - The PENDING → CONFIRMED/FAILED booking lifecycle
//! - [`messaging`] - Broker envelope, topic exchange, queue topology
//! - [`events`] - Typed payloads and the publisher
//! - [`inventory`] - Atomic per-event seat reservation
//! - [`ledger`] - Booking records plus outbox staging
//! - [`orchestration`] - The saga driver, reservation client, outbox relay
//! - [`consumers`] - Worker loop, dedup registry, the three consumers
//! - [`resilience`] - Circuit breaker around the reservation boundary
//! - [`web`] - Axum handlers over the shared state
//! - [`config`] - Environment-driven runtime configuration
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust
//! use helabooking_core::inventory::InventoryStore;
//! use helabooking_core::models::EventRequest;
//!
//! let inventory = InventoryStore::new();
//! let event = inventory
//!     .create_event(EventRequest::new("Rust Meetup", "Colombo", chrono::Utc::now(), 100))
//!     .unwrap();
//!
//! // Atomic check-and-decrement: true reserves, false denies untouched
//! assert!(inventory.reserve_seats(event.id, 3).unwrap());
//! assert_eq!(inventory.get_event(event.id).unwrap().available_seats, 97);
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # All tests, including the saga and web suites
//! ```

pub mod config;
pub mod constants;
pub mod consumers;
pub mod error;
pub mod events;
pub mod inventory;
pub mod ledger;
pub mod logging;
pub mod messaging;
pub mod models;
pub mod orchestration;
pub mod outbox;
pub mod resilience;
pub mod state_machine;
pub mod web;

pub use config::HelabookingConfig;
pub use constants::{queues, routing_keys, system};
pub use error::{HelabookingError, Result};
pub use inventory::InventoryStore;
pub use ledger::BookingLedger;
pub use messaging::{BrokerMessage, BrokerTopology, ConsumerGroup, EventBroker};
pub use orchestration::{BookingOrchestrator, OutboxRelay, PublishMode};
pub use state_machine::{BookingEvent, BookingState};
