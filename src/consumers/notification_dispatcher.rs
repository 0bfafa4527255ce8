//! # Notification Dispatcher
//!
//! Subscribes to all three domain events and records one outbound email per
//! original event. Dispatch is a store write marked SENT; wiring a real mail
//! transport behind [`NotificationStore`] is deliberately out of scope here.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::info;

use super::{ConsumerError, DedupRegistry, EventConsumer, HandleOutcome};
use crate::constants::{routing_keys, system};
use crate::events::{BookingConfirmed, EventCreated, UserRegistered};
use crate::messaging::BrokerMessage;
use crate::models::{Notification, NotificationChannel};

/// In-memory log of dispatched notifications.
#[derive(Debug, Default)]
pub struct NotificationStore {
    notifications: RwLock<Vec<Notification>>,
    next_id: AtomicI64,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &self,
        recipient: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Notification {
        let notification = Notification {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            recipient: recipient.into(),
            subject: subject.into(),
            body: body.into(),
            channel: NotificationChannel::Email,
            status: "SENT".to_string(),
            sent_at: Utc::now(),
        };
        self.notifications.write().push(notification.clone());
        notification
    }

    pub fn list_all(&self) -> Vec<Notification> {
        self.notifications.read().clone()
    }

    pub fn for_recipient(&self, recipient: &str) -> Vec<Notification> {
        self.notifications
            .read()
            .iter()
            .filter(|notification| notification.recipient == recipient)
            .cloned()
            .collect()
    }

    pub fn notification_count(&self) -> usize {
        self.notifications.read().len()
    }
}

/// Consumer rendering domain events into outbound notifications.
pub struct NotificationDispatcher {
    store: Arc<NotificationStore>,
    dedup: DedupRegistry,
}

impl NotificationDispatcher {
    pub fn new(store: Arc<NotificationStore>) -> Self {
        Self {
            store,
            dedup: DedupRegistry::new(),
        }
    }

    /// Parse and render the outbound mail without touching the store, so
    /// failures surface before the delivery is claimed as seen.
    fn render(&self, message: &BrokerMessage) -> Result<(String, String, String), ConsumerError> {
        match message.message_type.as_str() {
            routing_keys::USER_REGISTERED => {
                let event: UserRegistered = self.parse(message)?;
                Ok((
                    event.email,
                    "Welcome to HelaBooking".to_string(),
                    format!(
                        "Welcome {}! Your account has been created successfully.",
                        event.username
                    ),
                ))
            }
            routing_keys::EVENT_CREATED => {
                let event: EventCreated = self.parse(message)?;
                Ok((
                    system::ADMIN_EMAIL.to_string(),
                    "New Event Created".to_string(),
                    format!(
                        "A new event '{}' has been created at {}",
                        event.event_name, event.location
                    ),
                ))
            }
            routing_keys::BOOKING_SUCCEEDED => {
                let event: BookingConfirmed = self.parse(message)?;
                Ok((
                    format!("user-{}@helabooking.com", event.user_id),
                    "Booking Confirmed".to_string(),
                    format!(
                        "Your booking for {} ticket(s) has been confirmed. Booking ID: {}",
                        event.number_of_tickets, event.booking_id
                    ),
                ))
            }
            other => Err(ConsumerError::unsupported(other)),
        }
    }

    fn parse<T: serde::de::DeserializeOwned>(
        &self,
        message: &BrokerMessage,
    ) -> Result<T, ConsumerError> {
        message
            .parse_payload()
            .map_err(|err| ConsumerError::malformed(&message.message_type, err.to_string()))
    }
}

#[async_trait]
impl EventConsumer for NotificationDispatcher {
    fn name(&self) -> &str {
        "notification-dispatcher"
    }

    async fn handle(&self, message: &BrokerMessage) -> Result<HandleOutcome, ConsumerError> {
        let (recipient, subject, body) = self.render(message)?;

        if !self
            .dedup
            .first_seen(&message.metadata.correlation_id, &message.message_type)
        {
            return Ok(HandleOutcome::AlreadyProcessed);
        }

        let notification = self.store.record(recipient, subject, body);
        info!(
            recipient = %notification.recipient,
            subject = %notification.subject,
            "📣 Notification dispatched for {}",
            message.message_type
        );
        Ok(HandleOutcome::Handled)
    }
}
