//! # Reservation Client
//!
//! The remote boundary of the saga. The orchestrator only ever talks to the
//! trait, so tests can inject slow, failing, or flaky reservation backends,
//! and the in-process client backed by the inventory store stays a detail.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::error::HelabookingError;
use crate::inventory::InventoryStore;

/// Failures of the reservation transport. A *denial* is not an error: the
/// call succeeded and answered `false`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReservationError {
    #[error("event {event_id} not found")]
    EventNotFound { event_id: i64 },

    #[error("reservation call timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("reservation transport error: {message}")]
    Transport { message: String },
}

impl ReservationError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

/// Seat reservation boundary.
#[async_trait]
pub trait ReservationClient: Send + Sync {
    /// Try to reserve `seats` on `event_id`.
    ///
    /// `Ok(true)` means reserved, `Ok(false)` means denied; `Err` means the
    /// outcome is unknown and the caller must fail closed.
    async fn reserve_seats(&self, event_id: i64, seats: i32) -> Result<bool, ReservationError>;
}

/// Reservation client backed by the local inventory store, with optional
/// injected latency for exercising the timeout path.
pub struct InProcessReservationClient {
    store: Arc<InventoryStore>,
    latency: Option<Duration>,
}

impl InProcessReservationClient {
    pub fn new(store: Arc<InventoryStore>) -> Self {
        Self {
            store,
            latency: None,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

#[async_trait]
impl ReservationClient for InProcessReservationClient {
    async fn reserve_seats(&self, event_id: i64, seats: i32) -> Result<bool, ReservationError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        match self.store.reserve_seats(event_id, seats) {
            Ok(reserved) => Ok(reserved),
            Err(HelabookingError::NotFound(_)) => {
                Err(ReservationError::EventNotFound { event_id })
            }
            Err(err) => Err(ReservationError::transport(err.to_string())),
        }
    }
}
