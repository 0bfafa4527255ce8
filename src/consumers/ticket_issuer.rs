//! # Ticket Issuer
//!
//! Subscribes to `booking.succeeded` and mints one ticket per reserved
//! seat. Tickets are the consumer's authoritative record: before trusting
//! the dedup registry, the issuer checks whether tickets for the booking
//! already exist, so a redelivery can never double-issue even if the
//! registry were lost.

use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::{ConsumerError, DedupRegistry, EventConsumer, HandleOutcome};
use crate::constants::routing_keys;
use crate::events::BookingConfirmed;
use crate::messaging::BrokerMessage;
use crate::models::Ticket;

#[derive(Debug, Default)]
struct TicketStoreInner {
    tickets: Vec<Ticket>,
    numbers: HashSet<String>,
}

/// In-memory ticket storage with unique ticket numbers.
#[derive(Debug, Default)]
pub struct TicketStore {
    inner: RwLock<TicketStoreInner>,
    next_id: AtomicI64,
}

impl TicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Insert a ticket if its number is unused. Returns `false` on a number
    /// collision so the caller can regenerate.
    pub fn insert(&self, ticket: Ticket) -> bool {
        let mut inner = self.inner.write();
        if !inner.numbers.insert(ticket.ticket_number.clone()) {
            return false;
        }
        inner.tickets.push(ticket);
        true
    }

    pub fn has_tickets_for_booking(&self, booking_id: i64) -> bool {
        self.inner
            .read()
            .tickets
            .iter()
            .any(|ticket| ticket.booking_id == booking_id)
    }

    pub fn tickets_for_booking(&self, booking_id: i64) -> Vec<Ticket> {
        self.inner
            .read()
            .tickets
            .iter()
            .filter(|ticket| ticket.booking_id == booking_id)
            .cloned()
            .collect()
    }

    pub fn tickets_for_user(&self, user_id: i64) -> Vec<Ticket> {
        self.inner
            .read()
            .tickets
            .iter()
            .filter(|ticket| ticket.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn find_by_number(&self, ticket_number: &str) -> Option<Ticket> {
        self.inner
            .read()
            .tickets
            .iter()
            .find(|ticket| ticket.ticket_number == ticket_number)
            .cloned()
    }

    pub fn list_all(&self) -> Vec<Ticket> {
        self.inner.read().tickets.clone()
    }

    pub fn ticket_count(&self) -> usize {
        self.inner.read().tickets.len()
    }
}

/// Consumer turning confirmed bookings into issued tickets.
pub struct TicketIssuer {
    store: Arc<TicketStore>,
    dedup: DedupRegistry,
}

impl TicketIssuer {
    pub fn new(store: Arc<TicketStore>) -> Self {
        Self {
            store,
            dedup: DedupRegistry::new(),
        }
    }

    fn issue_tickets(&self, event: &BookingConfirmed) -> usize {
        let mut issued = 0;
        for _ in 0..event.number_of_tickets {
            // The 8-char suffix can collide; regenerate until the store
            // accepts the number.
            loop {
                let ticket_number = generate_ticket_number();
                let ticket = Ticket {
                    id: self.store.next_id(),
                    booking_id: event.booking_id,
                    user_id: event.user_id,
                    event_id: event.event_id,
                    qr_code: generate_qr_code(&ticket_number),
                    barcode: generate_barcode(&ticket_number),
                    ticket_number,
                    issued_at: Utc::now(),
                };
                if self.store.insert(ticket) {
                    break;
                }
            }
            issued += 1;
        }
        issued
    }
}

#[async_trait]
impl EventConsumer for TicketIssuer {
    fn name(&self) -> &str {
        "ticket-issuer"
    }

    async fn handle(&self, message: &BrokerMessage) -> Result<HandleOutcome, ConsumerError> {
        if message.message_type != routing_keys::BOOKING_SUCCEEDED {
            return Err(ConsumerError::unsupported(&message.message_type));
        }
        let event: BookingConfirmed = message
            .parse_payload()
            .map_err(|err| ConsumerError::malformed(&message.message_type, err.to_string()))?;

        // Authoritative check first, registry second: existing tickets win
        // over whatever the registry remembers.
        if self.store.has_tickets_for_booking(event.booking_id) {
            debug!(
                booking_id = event.booking_id,
                "🔁 Tickets already issued for booking; skipping"
            );
            return Ok(HandleOutcome::AlreadyProcessed);
        }
        if !self
            .dedup
            .first_seen(&message.metadata.correlation_id, &message.message_type)
        {
            return Ok(HandleOutcome::AlreadyProcessed);
        }

        let issued = self.issue_tickets(&event);
        info!(
            booking_id = event.booking_id,
            user_id = event.user_id,
            issued,
            "🎟️ Issued {} ticket(s) for booking {}",
            issued,
            event.booking_id
        );
        Ok(HandleOutcome::Handled)
    }
}

fn short_token() -> String {
    let hex = Uuid::new_v4().simple().to_string().to_uppercase();
    hex[..8].to_string()
}

fn generate_ticket_number() -> String {
    format!("TICKET-{}", short_token())
}

fn generate_qr_code(ticket_number: &str) -> String {
    format!("QR-{}-{}", ticket_number, short_token())
}

fn generate_barcode(ticket_number: &str) -> String {
    format!(
        "BC-{}{}",
        ticket_number.replace('-', ""),
        Utc::now().timestamp_millis()
    )
}
