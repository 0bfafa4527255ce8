//! # System Constants
//!
//! Routing keys, queue names, and operational defaults that define the
//! boundaries of the booking saga system. Queue names follow the
//! `{consumer_group}.{routing_key}.queue` convention so that every
//! (group, event) pair owns an isolated, independently-acknowledged stream.

/// Routing keys for the domain events flowing through the topic exchange.
pub mod routing_keys {
    pub const USER_REGISTERED: &str = "user.registered";
    pub const EVENT_CREATED: &str = "event.created";
    pub const BOOKING_SUCCEEDED: &str = "booking.succeeded";
}

/// Durable queue names, one per (consumer group, routing key) binding.
pub mod queues {
    // Ticketing group: only booking confirmations produce tickets
    pub const TICKETING_BOOKING_SUCCEEDED: &str = "ticketing.booking.succeeded.queue";

    // Notification group: fan-in of all three domain events
    pub const NOTIFICATION_USER_REGISTERED: &str = "notification.user.registered.queue";
    pub const NOTIFICATION_EVENT_CREATED: &str = "notification.event.created.queue";
    pub const NOTIFICATION_BOOKING_SUCCEEDED: &str = "notification.booking.succeeded.queue";

    // Audit group: fan-in of all three domain events
    pub const AUDIT_USER_REGISTERED: &str = "audit.user.registered.queue";
    pub const AUDIT_EVENT_CREATED: &str = "audit.event.created.queue";
    pub const AUDIT_BOOKING_SUCCEEDED: &str = "audit.booking.succeeded.queue";
}

/// System-wide defaults and operational boundaries.
pub mod system {
    use std::time::Duration;

    /// Name of the topic exchange all domain events are published to.
    pub const DEFAULT_EXCHANGE: &str = "helabooking.exchange";

    /// Upper bound on a single remote seat-reservation call. The saga fails
    /// closed when this elapses: the booking lands in FAILED and seats are
    /// assumed not reserved.
    pub const DEFAULT_RESERVATION_TIMEOUT: Duration = Duration::from_secs(2);

    /// How long a delivered message stays invisible before it is considered
    /// unacknowledged and becomes eligible for redelivery.
    pub const DEFAULT_VISIBILITY_TIMEOUT: Duration = Duration::from_secs(30);

    /// Consumer poll cadence between queue reads.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

    /// Maximum messages claimed per queue read.
    pub const DEFAULT_BATCH_SIZE: usize = 10;

    /// Deliveries after which a persistently failing message is parked in the
    /// dead-letter archive instead of being redelivered.
    pub const DEFAULT_MAX_DELIVERY_ATTEMPTS: u32 = 5;

    /// Outbox relay poll cadence.
    pub const DEFAULT_OUTBOX_POLL_INTERVAL: Duration = Duration::from_millis(200);

    /// Maximum outbox entries claimed per relay pass.
    pub const DEFAULT_OUTBOX_BATCH_SIZE: usize = 50;

    /// Recipient for operator-facing notifications (e.g. new event created).
    pub const ADMIN_EMAIL: &str = "admin@helabooking.com";

    /// Default HTTP bind address for the server binary.
    pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
}
