//! Lifecycle of the telemetry streaming connection.
//!
//! ```text
//! Disconnected → Connecting → Connected → Closed
//!                    │            │
//!                    └──────┬─────┘
//!                           ▼
//!                        Errored
//! ```
//!
//! There is no way back to `Connecting`: once the stream ends the bridge
//! stops.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TransitionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Closed,
    Errored,
}

impl ConnectionState {
    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Errored)
    }

    /// Whether `self → next` is a legal move.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Disconnected, Self::Connecting)
                | (Self::Connecting, Self::Connected | Self::Errored)
                | (Self::Connected, Self::Closed | Self::Errored)
        )
    }

    /// Move to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when the move is not part of the
    /// lifecycle.
    pub fn transition(&mut self, next: Self) -> Result<(), TransitionError> {
        if !self.can_transition_to(next) {
            return Err(TransitionError { from: *self, to: next });
        }
        *self = next;
        Ok(())
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => f.write_str("disconnected"),
            Self::Connecting => f.write_str("connecting"),
            Self::Connected => f.write_str("connected"),
            Self::Closed => f.write_str("closed"),
            Self::Errored => f.write_str("errored"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_disconnected() {
        assert_eq!(ConnectionState::default(), ConnectionState::Disconnected);
    }

    #[test]
    fn should_walk_happy_path_to_closed() {
        let mut state = ConnectionState::default();
        state.transition(ConnectionState::Connecting).unwrap();
        state.transition(ConnectionState::Connected).unwrap();
        state.transition(ConnectionState::Closed).unwrap();
        assert!(state.is_terminal());
    }

    #[test]
    fn should_allow_connect_failure() {
        let mut state = ConnectionState::Connecting;
        state.transition(ConnectionState::Errored).unwrap();
        assert_eq!(state, ConnectionState::Errored);
    }

    #[test]
    fn should_never_reconnect() {
        for from in [ConnectionState::Closed, ConnectionState::Errored] {
            let mut state = from;
            let err = state.transition(ConnectionState::Connecting).unwrap_err();
            assert_eq!(err.from, from);
            assert_eq!(state, from);
        }
    }

    #[test]
    fn should_reject_skipping_connecting() {
        let mut state = ConnectionState::Disconnected;
        assert!(state.transition(ConnectionState::Connected).is_err());
    }

    #[test]
    fn should_serialize_lowercase() {
        let json = serde_json::to_string(&ConnectionState::Connected).unwrap();
        assert_eq!(json, "\"connected\"");
    }
}
