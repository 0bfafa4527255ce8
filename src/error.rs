use thiserror::Error;

use crate::messaging::errors::MessagingError;
use crate::state_machine::StateMachineError;

/// Top-level error taxonomy for the booking core.
///
/// Subsystems carry their own richer error types (`MessagingError`,
/// `StateMachineError`, `ReservationError`); this enum is the lightweight,
/// clonable form they collapse into at the orchestration and web seams.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HelabookingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("State transition error: {0}")]
    StateTransition(String),

    #[error("Orchestration error: {0}")]
    Orchestration(String),

    #[error("Messaging error: {0}")]
    Messaging(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<MessagingError> for HelabookingError {
    fn from(err: MessagingError) -> Self {
        HelabookingError::Messaging(err.to_string())
    }
}

impl From<StateMachineError> for HelabookingError {
    fn from(err: StateMachineError) -> Self {
        HelabookingError::StateTransition(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HelabookingError>;
