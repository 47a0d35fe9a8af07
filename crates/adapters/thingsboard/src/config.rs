//! ThingsBoard connection configuration.

use std::time::Duration;

use serde::Deserialize;

use classlight_domain::id::DeviceId;

/// Where the ThingsBoard instance lives and how to authenticate with it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThingsboardConfig {
    /// ThingsBoard hostname or IP address.
    pub host: String,
    /// HTTP/WebSocket port.
    pub port: u16,
    /// JWT bearer token used for both the WebSocket and REST APIs.
    pub token: String,
    /// Use `wss://` / `https://` instead of plain `ws://` / `http://`.
    pub tls: bool,
    /// Per-request timeout for actuator calls, in seconds. `0` disables it.
    pub request_timeout_secs: u64,
}

impl Default for ThingsboardConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            token: String::new(),
            tls: false,
            request_timeout_secs: 0,
        }
    }
}

impl ThingsboardConfig {
    /// Telemetry WebSocket endpoint, with the token as a query parameter.
    #[must_use]
    pub fn websocket_url(&self) -> String {
        let scheme = if self.tls { "wss" } else { "ws" };
        format!(
            "{scheme}://{}:{}/api/ws/plugins/telemetry?token={}",
            self.host, self.port, self.token
        )
    }

    /// One-way RPC endpoint for `device`.
    #[must_use]
    pub fn rpc_url(&self, device: &DeviceId) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        format!(
            "{scheme}://{}:{}/api/plugins/rpc/oneway/{device}",
            self.host, self.port
        )
    }

    /// `X-Authorization` header value.
    #[must_use]
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.token)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}
