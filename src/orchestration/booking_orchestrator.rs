//! # Booking Orchestrator
//!
//! Drives the booking saga: persist PENDING, make exactly one protected
//! reservation attempt, then settle the booking as CONFIRMED or FAILED
//! before returning. The caller can never observe PENDING as an answer.
//!
//! The reservation boundary fails closed. A timeout or transport error
//! leaves the real outcome unknown, and the saga treats unknown as failed;
//! the ledger never confirms seats it cannot prove were reserved. There is
//! deliberately no retry here: retrying a timed-out reservation could
//! double-reserve seats, since the first attempt may have landed.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::reservation_client::{ReservationClient, ReservationError};
use crate::error::{HelabookingError, Result};
use crate::events::{BookingConfirmed, EventPublisher};
use crate::ledger::BookingLedger;
use crate::logging::log_saga_operation;
use crate::models::{Booking, BookingRequest};
use crate::outbox::OutboxEntry;
use crate::resilience::{CircuitBreaker, CircuitBreakerError};
use crate::state_machine::BookingEvent;

/// How confirmed-booking events reach the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PublishMode {
    /// Publish inline after the CONFIRMED write. A publish failure is
    /// logged and swallowed, so the event can be lost.
    #[default]
    Direct,
    /// Stage the event in the ledger's outbox in the same critical section
    /// as the CONFIRMED write; the relay retries until it lands.
    Outbox,
}

impl fmt::Display for PublishMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishMode::Direct => write!(f, "direct"),
            PublishMode::Outbox => write!(f, "outbox"),
        }
    }
}

impl FromStr for PublishMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "direct" => Ok(PublishMode::Direct),
            "outbox" => Ok(PublishMode::Outbox),
            _ => Err(format!("Unknown publish mode: {s}")),
        }
    }
}

/// Collapsed result of one protected reservation attempt.
enum ReservationOutcome {
    Reserved,
    Denied(String),
    Errored(String),
}

/// Saga director for bookings.
pub struct BookingOrchestrator {
    ledger: Arc<BookingLedger>,
    reservations: Arc<dyn ReservationClient>,
    publisher: EventPublisher,
    breaker: Arc<CircuitBreaker>,
    reservation_timeout: Duration,
    publish_mode: PublishMode,
}

impl BookingOrchestrator {
    pub fn new(
        ledger: Arc<BookingLedger>,
        reservations: Arc<dyn ReservationClient>,
        publisher: EventPublisher,
        breaker: Arc<CircuitBreaker>,
        reservation_timeout: Duration,
        publish_mode: PublishMode,
    ) -> Self {
        info!(
            timeout_ms = reservation_timeout.as_millis() as u64,
            publish_mode = %publish_mode,
            "🚀 Booking orchestrator initialized"
        );
        Self {
            ledger,
            reservations,
            publisher,
            breaker,
            reservation_timeout,
            publish_mode,
        }
    }

    /// Run the booking saga end to end.
    ///
    /// The returned booking is always terminal: CONFIRMED with its event
    /// handed off, or FAILED with no seats held. Requests that never reach
    /// the reservation step (bad input) error out instead.
    pub async fn create_booking(&self, request: BookingRequest) -> Result<Booking> {
        if request.number_of_tickets <= 0 {
            return Err(HelabookingError::Validation(format!(
                "numberOfTickets must be positive, got {}",
                request.number_of_tickets
            )));
        }
        if let Some(price) = request.price_per_ticket {
            if price < 0 {
                return Err(HelabookingError::Validation(format!(
                    "pricePerTicket must not be negative, got {price}"
                )));
            }
        }

        let pending = self.ledger.insert_pending(&request);
        log_saga_operation(
            "create_booking",
            Some(pending.id),
            Some(pending.event_id),
            "PENDING",
            None,
        );

        let outcome = self
            .reserve_with_protection(pending.event_id, pending.number_of_tickets)
            .await;

        let booking = match outcome {
            ReservationOutcome::Reserved => self.confirm(pending.id)?,
            ReservationOutcome::Denied(reason) => {
                let failed = self
                    .ledger
                    .transition(pending.id, &BookingEvent::ReserveDenied(reason.clone()))?;
                info!(
                    booking_id = failed.id,
                    reason = %reason,
                    "🚫 Booking failed: reservation denied"
                );
                failed
            }
            ReservationOutcome::Errored(reason) => {
                let failed = self
                    .ledger
                    .transition(pending.id, &BookingEvent::ReserveErrored(reason.clone()))?;
                warn!(
                    booking_id = failed.id,
                    reason = %reason,
                    "⚠️ Booking failed closed: reservation outcome unknown"
                );
                failed
            }
        };

        log_saga_operation(
            "create_booking",
            Some(booking.id),
            Some(booking.event_id),
            &booking.status.to_string(),
            None,
        );
        Ok(booking)
    }

    /// One reservation attempt, bounded by the timeout and shielded by the
    /// circuit breaker. A denial is a successful call answering `false` and
    /// never trips the breaker; only errors and timeouts count as failures.
    async fn reserve_with_protection(&self, event_id: i64, seats: i32) -> ReservationOutcome {
        let timeout_ms = self.reservation_timeout.as_millis() as u64;
        let result = self
            .breaker
            .call(|| async {
                match tokio::time::timeout(
                    self.reservation_timeout,
                    self.reservations.reserve_seats(event_id, seats),
                )
                .await
                {
                    Ok(outcome) => outcome,
                    Err(_elapsed) => Err(ReservationError::Timeout { timeout_ms }),
                }
            })
            .await;

        match result {
            Ok(true) => ReservationOutcome::Reserved,
            Ok(false) => ReservationOutcome::Denied("seats unavailable".to_string()),
            Err(CircuitBreakerError::CircuitOpen { component }) => {
                ReservationOutcome::Errored(format!("circuit breaker open for {component}"))
            }
            Err(CircuitBreakerError::OperationFailed(err)) => {
                ReservationOutcome::Errored(err.to_string())
            }
        }
    }

    /// Settle a successful reservation: CONFIRMED write, then the event.
    ///
    /// Publication strictly follows the commit. In direct mode a publish
    /// failure leaves the booking CONFIRMED and the event lost; in outbox
    /// mode the entry commits with the status and cannot be lost.
    fn confirm(&self, booking_id: i64) -> Result<Booking> {
        match self.publish_mode {
            PublishMode::Direct => {
                let confirmed = self
                    .ledger
                    .transition(booking_id, &BookingEvent::ReserveSucceeded)?;
                let event = BookingConfirmed::for_booking(&confirmed);
                if let Err(err) = self.publisher.publish(&event) {
                    warn!(
                        booking_id,
                        error = %err,
                        "⚠️ BookingConfirmed publish failed; booking stays CONFIRMED, event lost"
                    );
                }
                Ok(confirmed)
            }
            PublishMode::Outbox => {
                self.ledger
                    .transition_and_stage(booking_id, &BookingEvent::ReserveSucceeded, |booking| {
                        let event = BookingConfirmed::for_booking(booking);
                        OutboxEntry::for_event(&event).map_err(|err| {
                            HelabookingError::Orchestration(format!(
                                "failed to stage confirmation event: {err}"
                            ))
                        })
                    })
            }
        }
    }

    pub fn get_booking(&self, booking_id: i64) -> Result<Booking> {
        self.ledger
            .get(booking_id)
            .ok_or_else(|| HelabookingError::NotFound(format!("booking {booking_id}")))
    }

    pub fn bookings_for_user(&self, user_id: i64) -> Vec<Booking> {
        self.ledger.list_by_user(user_id)
    }

    pub fn list_bookings(&self) -> Vec<Booking> {
        self.ledger.list_all()
    }

    pub fn publish_mode(&self) -> PublishMode {
        self.publish_mode
    }
}
