//! # Notification Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Delivery channel for an outbound notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationChannel {
    #[default]
    Email,
    Sms,
    Push,
}

impl fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NotificationChannel::Email => "EMAIL",
            NotificationChannel::Sms => "SMS",
            NotificationChannel::Push => "PUSH",
        };
        write!(f, "{s}")
    }
}

/// A recorded outbound notification.
///
/// Dispatch here means the send was recorded and marked SENT; actual
/// transport integration sits behind this model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub channel: NotificationChannel,
    pub status: String,
    pub sent_at: DateTime<Utc>,
}
