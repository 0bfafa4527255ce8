use tracing::debug;

use super::errors::{StateMachineError, StateMachineResult};
use super::events::BookingEvent;
use super::states::BookingState;

/// Pure transition table for the booking saga.
///
/// The machine holds no storage of its own: callers hand in the current
/// state and receive the validated target. The booking ledger applies the
/// result under its write lock, so resolve and apply share one critical
/// section.
pub struct BookingStateMachine;

impl BookingStateMachine {
    /// Resolve and validate the target state for `event`.
    pub fn transition(
        current_state: BookingState,
        event: &BookingEvent,
    ) -> StateMachineResult<BookingState> {
        let target_state = Self::determine_target_state(current_state, event)?;

        debug!(
            from = %current_state,
            to = %target_state,
            event = event.event_type(),
            "🔁 Booking state transition resolved"
        );

        Ok(target_state)
    }

    /// Determine the target state based on current state and event
    fn determine_target_state(
        current_state: BookingState,
        event: &BookingEvent,
    ) -> StateMachineResult<BookingState> {
        let target = match (current_state, event) {
            // The single happy-path transition
            (BookingState::Pending, BookingEvent::ReserveSucceeded) => BookingState::Confirmed,

            // All reservation failures collapse into FAILED
            (BookingState::Pending, BookingEvent::ReserveDenied(_)) => BookingState::Failed,
            (BookingState::Pending, BookingEvent::ReserveErrored(_)) => BookingState::Failed,

            // Terminal states accept no further events
            (from_state, _) => {
                return Err(StateMachineError::InvalidTransition {
                    from: from_state,
                    event: event.event_type().to_string(),
                })
            }
        };

        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_confirms_on_success() {
        let target =
            BookingStateMachine::transition(BookingState::Pending, &BookingEvent::ReserveSucceeded)
                .unwrap();
        assert_eq!(target, BookingState::Confirmed);
    }

    #[test]
    fn test_pending_fails_on_denial_and_error() {
        let denied = BookingStateMachine::transition(
            BookingState::Pending,
            &BookingEvent::ReserveDenied("insufficient seats".to_string()),
        )
        .unwrap();
        assert_eq!(denied, BookingState::Failed);

        let errored = BookingStateMachine::transition(
            BookingState::Pending,
            &BookingEvent::ReserveErrored("reservation call timed out".to_string()),
        )
        .unwrap();
        assert_eq!(errored, BookingState::Failed);
    }

    #[test]
    fn test_terminal_states_reject_all_events() {
        let events = [
            BookingEvent::ReserveSucceeded,
            BookingEvent::ReserveDenied("late denial".to_string()),
            BookingEvent::ReserveErrored("late error".to_string()),
        ];
        for state in [BookingState::Confirmed, BookingState::Failed] {
            for event in &events {
                let result = BookingStateMachine::transition(state, event);
                assert!(
                    matches!(
                        result,
                        Err(StateMachineError::InvalidTransition { from, .. }) if from == state
                    ),
                    "expected {state} to reject {}",
                    event.event_type()
                );
            }
        }
    }
}
