//! # Ticket Model
//!
//! One ticket per reserved seat, issued asynchronously after a booking
//! confirms. Ticket numbers are unique across the store and double as the
//! public lookup key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An issued ticket. Serves as its own wire shape on the read endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: i64,
    pub booking_id: i64,
    pub user_id: i64,
    pub event_id: i64,
    /// Public identifier, `TICKET-XXXXXXXX`.
    pub ticket_number: String,
    /// QR payload derived from the ticket number.
    pub qr_code: String,
    /// Scan-line code derived from the ticket number and issue time.
    pub barcode: String,
    pub issued_at: DateTime<Utc>,
}
