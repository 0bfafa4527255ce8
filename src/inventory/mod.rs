//! # Seat Inventory Store
//!
//! Event catalog rows plus the reservation primitive the whole saga leans
//! on. Each row sits behind its own mutex, and `reserve_seats` holds that
//! lock across the availability check *and* the decrement, so two racing
//! reservations can never both pass the check on the last seats. Rows do
//! not contend with each other.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::{HelabookingError, Result};
use crate::models::{EventRecord, EventRequest, EventStatus};

/// Catalog and seat inventory, acting as the reservation authority.
#[derive(Debug, Default)]
pub struct InventoryStore {
    rows: DashMap<i64, Arc<Mutex<EventRecord>>>,
    next_id: AtomicI64,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog event. New events start as DRAFT with every seat
    /// available.
    pub fn create_event(&self, request: EventRequest) -> Result<EventRecord> {
        if request.capacity <= 0 {
            return Err(HelabookingError::Validation(format!(
                "capacity must be positive, got {}",
                request.capacity
            )));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let record = EventRecord {
            id,
            name: request.name,
            location: request.location,
            event_date: request.event_date,
            capacity: request.capacity,
            available_seats: request.capacity,
            status: EventStatus::Draft,
            published_at: None,
            created_at: Utc::now(),
        };
        self.rows.insert(id, Arc::new(Mutex::new(record.clone())));

        info!(
            event_id = id,
            name = %record.name,
            capacity = record.capacity,
            "🎪 Event created"
        );
        Ok(record)
    }

    /// Fetch a snapshot of an event row.
    pub fn get_event(&self, event_id: i64) -> Result<EventRecord> {
        let row = self.row(event_id)?;
        let record = row.lock().clone();
        Ok(record)
    }

    /// Snapshot of every event, ordered by id.
    pub fn list_events(&self) -> Vec<EventRecord> {
        let mut events: Vec<EventRecord> = self
            .rows
            .iter()
            .map(|entry| entry.value().lock().clone())
            .collect();
        events.sort_by_key(|record| record.id);
        events
    }

    /// Move a DRAFT event to PUBLISHED, stamping `published_at`.
    ///
    /// Publishing an already published event is a no-op; a CLOSED event
    /// cannot be re-published.
    pub fn publish_event(&self, event_id: i64) -> Result<EventRecord> {
        let row = self.row(event_id)?;
        let mut record = row.lock();
        match record.status {
            EventStatus::Draft => {
                record.status = EventStatus::Published;
                record.published_at = Some(Utc::now());
                info!(event_id, name = %record.name, "📣 Event published");
            }
            EventStatus::Published => {}
            EventStatus::Closed => {
                return Err(HelabookingError::Validation(format!(
                    "event {event_id} is closed and cannot be published"
                )));
            }
        }
        Ok(record.clone())
    }

    /// Close an event, ending all further reservations. Idempotent.
    pub fn close_event(&self, event_id: i64) -> Result<EventRecord> {
        let row = self.row(event_id)?;
        let mut record = row.lock();
        if record.status != EventStatus::Closed {
            record.status = EventStatus::Closed;
            info!(event_id, name = %record.name, "🔒 Event closed");
        }
        Ok(record.clone())
    }

    /// Atomically reserve `seats` on an event.
    ///
    /// Returns `Ok(true)` and decrements availability when enough seats
    /// remain, `Ok(false)` when the event denies the reservation (too few
    /// seats, or closed). The check and decrement happen under the row
    /// lock, so concurrent callers serialize on this event only.
    pub fn reserve_seats(&self, event_id: i64, seats: i32) -> Result<bool> {
        if seats <= 0 {
            return Err(HelabookingError::Validation(format!(
                "seat count must be positive, got {seats}"
            )));
        }

        let row = self.row(event_id)?;
        let mut record = row.lock();

        if !record.status.is_reservable() {
            debug!(event_id, status = %record.status, "🚫 Reservation denied: event not reservable");
            return Ok(false);
        }
        if record.available_seats < seats {
            debug!(
                event_id,
                requested = seats,
                available = record.available_seats,
                "🚫 Reservation denied: insufficient seats"
            );
            return Ok(false);
        }

        record.available_seats -= seats;
        info!(
            event_id,
            reserved = seats,
            remaining = record.available_seats,
            "🎟️ Seats reserved"
        );
        Ok(true)
    }

    /// Number of catalog events, for health reporting.
    pub fn event_count(&self) -> usize {
        self.rows.len()
    }

    fn row(&self, event_id: i64) -> Result<Arc<Mutex<EventRecord>>> {
        self.rows
            .get(&event_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| HelabookingError::NotFound(format!("event {event_id}")))
    }
}
