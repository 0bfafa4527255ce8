//! # Booking Ledger
//!
//! Authoritative store for booking rows and, in outbox mode, the staged
//! event entries. Both live behind one write lock: `transition_and_stage`
//! commits the CONFIRMED status and the outbox entry in a single critical
//! section, or neither, which is what makes the outbox transactional.
//!
//! All writes go through the state machine, so an already-terminal booking
//! can never be transitioned again.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{HelabookingError, Result};
use crate::models::{Booking, BookingRequest};
use crate::outbox::OutboxEntry;
use crate::state_machine::{BookingEvent, BookingState, BookingStateMachine};

#[derive(Debug, Default)]
struct LedgerInner {
    bookings: BTreeMap<i64, Booking>,
    outbox: Vec<OutboxEntry>,
}

/// Booking rows plus staged outbox entries under one lock.
#[derive(Debug, Default)]
pub struct BookingLedger {
    inner: RwLock<LedgerInner>,
    next_id: AtomicI64,
}

impl BookingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist a new booking in PENDING.
    pub fn insert_pending(&self, request: &BookingRequest) -> Booking {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let booking = Booking {
            id,
            user_id: request.user_id,
            event_id: request.event_id,
            number_of_tickets: request.number_of_tickets,
            ticket_type: request.ticket_type.unwrap_or_default(),
            price_per_ticket: request.price_per_ticket,
            total_price: request.total_price(),
            status: BookingState::Pending,
            created_at: now,
            updated_at: now,
        };
        self.inner.write().bookings.insert(id, booking.clone());

        info!(
            booking_id = id,
            user_id = request.user_id,
            event_id = request.event_id,
            tickets = request.number_of_tickets,
            "📝 Booking persisted as PENDING"
        );
        booking
    }

    /// Apply a saga event to a booking.
    pub fn transition(&self, booking_id: i64, event: &BookingEvent) -> Result<Booking> {
        let mut inner = self.inner.write();
        let booking = inner
            .bookings
            .get_mut(&booking_id)
            .ok_or_else(|| HelabookingError::NotFound(format!("booking {booking_id}")))?;

        let target = BookingStateMachine::transition(booking.status, event)?;
        booking.status = target;
        booking.updated_at = Utc::now();
        let updated = booking.clone();
        drop(inner);

        info!(
            booking_id,
            to = %target,
            event = event.event_type(),
            reason = event.failure_reason(),
            "🔁 Booking transitioned"
        );
        Ok(updated)
    }

    /// Apply a saga event and stage an outbox entry in the same critical
    /// section. If `stage` fails, the booking is left untouched.
    pub fn transition_and_stage<F>(
        &self,
        booking_id: i64,
        event: &BookingEvent,
        stage: F,
    ) -> Result<Booking>
    where
        F: FnOnce(&Booking) -> Result<OutboxEntry>,
    {
        let mut inner = self.inner.write();
        let current = inner
            .bookings
            .get(&booking_id)
            .cloned()
            .ok_or_else(|| HelabookingError::NotFound(format!("booking {booking_id}")))?;

        let target = BookingStateMachine::transition(current.status, event)?;
        let mut updated = current;
        updated.status = target;
        updated.updated_at = Utc::now();

        // Build the entry before committing anything, so a staging failure
        // cannot leave a transitioned booking with no event.
        let entry = stage(&updated)?;
        let entry_id = entry.id;
        inner.bookings.insert(booking_id, updated.clone());
        inner.outbox.push(entry);
        drop(inner);

        info!(
            booking_id,
            to = %target,
            outbox_entry = %entry_id,
            "📮 Booking transitioned with staged event"
        );
        Ok(updated)
    }

    pub fn get(&self, booking_id: i64) -> Option<Booking> {
        self.inner.read().bookings.get(&booking_id).cloned()
    }

    pub fn list_by_user(&self, user_id: i64) -> Vec<Booking> {
        self.inner
            .read()
            .bookings
            .values()
            .filter(|booking| booking.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn list_all(&self) -> Vec<Booking> {
        self.inner.read().bookings.values().cloned().collect()
    }

    pub fn booking_count(&self) -> usize {
        self.inner.read().bookings.len()
    }

    /// Unpublished outbox entries, oldest first, up to `limit`.
    ///
    /// Entries stay claimable until marked published, so a relay crash
    /// between publish and mark yields a redelivery, never a loss.
    pub fn claim_unpublished(&self, limit: usize) -> Vec<OutboxEntry> {
        self.inner
            .read()
            .outbox
            .iter()
            .filter(|entry| !entry.is_published())
            .take(limit)
            .cloned()
            .collect()
    }

    /// Mark entries as published, returning how many were updated.
    pub fn mark_published(&self, ids: &[Uuid]) -> usize {
        let mut inner = self.inner.write();
        let now = Utc::now();
        let mut updated = 0;
        for entry in inner.outbox.iter_mut() {
            if entry.published_at.is_none() && ids.contains(&entry.id) {
                entry.published_at = Some(now);
                updated += 1;
            }
        }
        updated
    }

    /// Drop published entries older than `older_than`, returning how many.
    pub fn cleanup_published(&self, older_than: DateTime<Utc>) -> usize {
        let mut inner = self.inner.write();
        let before = inner.outbox.len();
        inner
            .outbox
            .retain(|entry| match entry.published_at {
                Some(published_at) => published_at >= older_than,
                None => true,
            });
        let removed = before - inner.outbox.len();
        if removed > 0 {
            debug!(removed, "🧹 Cleaned up published outbox entries");
        }
        removed
    }

    /// Number of entries still awaiting publication.
    pub fn outbox_depth(&self) -> usize {
        self.inner
            .read()
            .outbox
            .iter()
            .filter(|entry| !entry.is_published())
            .count()
    }
}
