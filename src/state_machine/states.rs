use serde::{Deserialize, Serialize};
use std::fmt;

/// Booking saga state definitions.
///
/// PENDING is the only non-terminal state, and it is never observable as a
/// final answer: the orchestrator always drives a booking to CONFIRMED or
/// FAILED before returning it to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingState {
    /// Initial state when the booking row is persisted
    #[default]
    Pending,
    /// Seats reserved; the confirmation event has been handed off
    Confirmed,
    /// Reservation denied, errored, or timed out; no seats held
    Failed,
}

impl BookingState {
    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed)
    }

    /// Check if the saga is still awaiting its reservation outcome
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for BookingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Confirmed => write!(f, "CONFIRMED"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

impl std::str::FromStr for BookingState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "CONFIRMED" => Ok(Self::Confirmed),
            "FAILED" => Ok(Self::Failed),
            _ => Err(format!("Invalid booking state: {s}")),
        }
    }
}
