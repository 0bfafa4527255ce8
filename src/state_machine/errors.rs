use thiserror::Error;

use super::states::BookingState;

/// Errors raised by the booking state machine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateMachineError {
    #[error("Invalid transition from {from} on {event}")]
    InvalidTransition { from: BookingState, event: String },
}

pub type StateMachineResult<T> = std::result::Result<T, StateMachineError>;
