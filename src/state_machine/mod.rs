// State machine module for the booking saga
//
// Provides the booking lifecycle as an explicit transition table: PENDING is
// the only non-terminal state, and every reservation outcome resolves it to
// CONFIRMED or FAILED exactly once.

pub mod booking_state_machine;
pub mod errors;
pub mod events;
pub mod states;

// Re-export main types for convenient access
pub use booking_state_machine::BookingStateMachine;
pub use errors::{StateMachineError, StateMachineResult};
pub use events::BookingEvent;
pub use states::BookingState;
