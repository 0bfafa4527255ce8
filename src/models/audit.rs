//! # Audit Trail Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One append-only audit record per observed domain event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: i64,
    /// Routing key of the observed event, e.g. `booking.succeeded`.
    pub event_type: String,
    /// Human-readable action label, e.g. `Booking Success`.
    pub action: String,
    /// Rendered detail line for the trail.
    pub details: String,
    pub recorded_at: DateTime<Utc>,
}
