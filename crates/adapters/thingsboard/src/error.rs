//! ThingsBoard adapter error types.

use classlight_domain::error::ClassLightError;
use classlight_domain::id::DeviceId;
use tokio_tungstenite::tungstenite;

/// Errors specific to the ThingsBoard adapter.
#[derive(Debug, thiserror::Error)]
pub enum ThingsboardError {
    /// The WebSocket handshake failed.
    #[error("failed to connect to telemetry stream")]
    Connect(#[source] Box<tungstenite::Error>),

    /// The WebSocket failed after it was established.
    #[error("telemetry stream failed")]
    Stream(#[source] Box<tungstenite::Error>),

    /// The sensor device has no entry in the subscription table.
    #[error("no subscription registered for sensor device {0}")]
    NotSubscribed(DeviceId),

    /// Failed to encode an outbound request as JSON.
    #[error("failed to encode request")]
    Encode(#[source] serde_json::Error),

    /// The HTTP request could not be performed.
    #[error("actuator request failed")]
    Http(#[source] reqwest::Error),

    /// ThingsBoard answered the RPC with a non-success status.
    #[error("actuator rejected command: {status} {reason}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase, or the response body when there is none.
        reason: String,
    },

    /// A domain-level error (invalid transition, validation).
    #[error("domain error")]
    Domain(#[source] ClassLightError),
}

impl ThingsboardError {
    /// Convert into a [`ClassLightError::Transport`] for propagation across
    /// port boundaries.
    #[must_use]
    pub fn into_domain(self) -> ClassLightError {
        match self {
            Self::Domain(err) => err,
            other => ClassLightError::Transport(Box::new(other)),
        }
    }
}

impl From<ThingsboardError> for ClassLightError {
    fn from(err: ThingsboardError) -> Self {
        err.into_domain()
    }
}
