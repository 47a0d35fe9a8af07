//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`ClassLightError`] at port boundaries.

use crate::connection::ConnectionState;

/// Base error type shared by every crate in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum ClassLightError {
    /// A value failed a domain invariant.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The connection state machine refused a transition.
    #[error("invalid connection transition")]
    Transition(#[from] TransitionError),

    /// An adapter failed to talk to the outside world.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A device identifier was empty.
    #[error("device identifier must not be empty")]
    EmptyDeviceId,

    /// An actuator output index was outside `0..=3`.
    #[error("output index {0} is out of range (expected 0..=3)")]
    OutputOutOfRange(u32),

    /// Two subscriptions were registered under the same command id.
    #[error("command id {0} is already registered")]
    DuplicateCommandId(u32),
}

/// A rejected [`ConnectionState`] transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot move connection from {from} to {to}")]
pub struct TransitionError {
    pub from: ConnectionState,
    pub to: ConnectionState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_output_out_of_range() {
        let err = ValidationError::OutputOutOfRange(7);
        assert_eq!(
            err.to_string(),
            "output index 7 is out of range (expected 0..=3)"
        );
    }

    #[test]
    fn should_convert_validation_error_into_base_error() {
        let err: ClassLightError = ValidationError::EmptyDeviceId.into();
        assert!(matches!(
            err,
            ClassLightError::Validation(ValidationError::EmptyDeviceId)
        ));
    }

    #[test]
    fn should_display_transition_error() {
        let err = TransitionError {
            from: ConnectionState::Closed,
            to: ConnectionState::Connecting,
        };
        assert_eq!(
            err.to_string(),
            "cannot move connection from closed to connecting"
        );
    }
}
