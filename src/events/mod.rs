pub mod payloads;
pub mod publisher;

// Re-export key types for convenience
pub use payloads::{BookingConfirmed, DomainEvent, EventCreated, UserRegistered};
pub use publisher::{EventPublisher, PublishError};
