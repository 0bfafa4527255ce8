use serde::{Deserialize, Serialize};

/// Events that can trigger booking state transitions.
///
/// Every reservation outcome maps onto exactly one of these. Denials,
/// transport errors, timeouts, and an open circuit all fail the saga; they
/// differ only in the reason carried for the trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum BookingEvent {
    /// Remote reservation confirmed the requested seats
    ReserveSucceeded,
    /// Remote reservation answered but declined (e.g. insufficient seats)
    ReserveDenied(String),
    /// Remote reservation errored, timed out, or was short-circuited
    ReserveErrored(String),
}

impl BookingEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ReserveSucceeded => "reserve_succeeded",
            Self::ReserveDenied(_) => "reserve_denied",
            Self::ReserveErrored(_) => "reserve_errored",
        }
    }

    /// Extract the failure reason if this is a failing event
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::ReserveDenied(reason) | Self::ReserveErrored(reason) => Some(reason),
            Self::ReserveSucceeded => None,
        }
    }

    /// Check if this event fails the saga
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::ReserveDenied(_) | Self::ReserveErrored(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_types() {
        assert_eq!(BookingEvent::ReserveSucceeded.event_type(), "reserve_succeeded");
        assert_eq!(
            BookingEvent::ReserveDenied("insufficient seats".to_string()).event_type(),
            "reserve_denied"
        );
        assert_eq!(
            BookingEvent::ReserveErrored("timed out".to_string()).event_type(),
            "reserve_errored"
        );
    }

    #[test]
    fn test_failure_reasons() {
        assert_eq!(BookingEvent::ReserveSucceeded.failure_reason(), None);
        assert!(!BookingEvent::ReserveSucceeded.is_failure());

        let denied = BookingEvent::ReserveDenied("insufficient seats".to_string());
        assert_eq!(denied.failure_reason(), Some("insufficient seats"));
        assert!(denied.is_failure());
    }
}
