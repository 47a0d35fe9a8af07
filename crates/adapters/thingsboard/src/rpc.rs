//! One-way RPC client: drives the light-control board through ThingsBoard.

use std::sync::Arc;

use classlight_app::ports::ActuatorClient;
use classlight_domain::actuator::LightCommand;
use classlight_domain::error::ClassLightError;
use classlight_domain::id::DeviceId;

use crate::config::ThingsboardConfig;
use crate::error::ThingsboardError;
use crate::wire::RpcRequest;

/// [`ActuatorClient`] that posts `putLights` calls to the server-side RPC API.
///
/// Cheap to clone: the connection pool and configuration are shared.
#[derive(Debug, Clone)]
pub struct RpcActuatorClient {
    http: reqwest::Client,
    config: Arc<ThingsboardConfig>,
}

impl RpcActuatorClient {
    /// Build a client for the given ThingsBoard instance.
    ///
    /// # Errors
    ///
    /// Returns [`ThingsboardError::Http`] when the HTTP client cannot be
    /// initialised (e.g. no TLS backend).
    pub fn new(config: ThingsboardConfig) -> Result<Self, ThingsboardError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ThingsboardError::Http)?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    async fn send(&self, device: &DeviceId, command: LightCommand) -> Result<(), ThingsboardError> {
        let url = self.config.rpc_url(device);
        let body = RpcRequest::from(command);

        tracing::debug!(%url, ledno = command.output.get(), value = command.on, "sending RPC");

        let response = self
            .http
            .post(&url)
            .header("X-Authorization", self.config.authorization())
            .json(&body)
            .send()
            .await
            .map_err(ThingsboardError::Http)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let reason = match status.canonical_reason() {
            Some(reason) => reason.to_string(),
            None => response.text().await.unwrap_or_default(),
        };
        Err(ThingsboardError::Rejected {
            status: status.as_u16(),
            reason,
        })
    }
}

impl ActuatorClient for RpcActuatorClient {
    async fn put_lights(&self, device: &DeviceId, command: LightCommand) -> Result<(), ClassLightError> {
        self.send(device, command)
            .await
            .map_err(ThingsboardError::into_domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classlight_domain::actuator::OutputIndex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Accept one HTTP request, answer with `status_line`, and return the
    /// raw request text.
    async fn serve_once(listener: TcpListener, status_line: &'static str) -> String {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 1024];

        loop {
            let n = socket.read(&mut buf).await.unwrap();
            raw.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&raw);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if raw.len() >= head_end + 4 + content_length {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }

        let response = format!("HTTP/1.1 {status_line}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8(raw).unwrap()
    }

    async fn client_and_server(
        status_line: &'static str,
    ) -> (RpcActuatorClient, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(serve_once(listener, status_line));
        let client = RpcActuatorClient::new(ThingsboardConfig {
            host: "127.0.0.1".to_string(),
            port,
            token: "secret-jwt".to_string(),
            ..ThingsboardConfig::default()
        })
        .unwrap();
        (client, server)
    }

    fn actuator() -> DeviceId {
        DeviceId::new("2d64b610-e006-11e7-b5ba-d7cf2e1f3808").unwrap()
    }

    #[tokio::test]
    async fn should_post_put_lights_with_bearer_header() {
        let (client, server) = client_and_server("200 OK").await;

        client
            .put_lights(&actuator(), LightCommand::new(OutputIndex::ALL[1], true))
            .await
            .unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with(
            "POST /api/plugins/rpc/oneway/2d64b610-e006-11e7-b5ba-d7cf2e1f3808 HTTP/1.1\r\n"
        ));
        assert!(
            request
                .to_ascii_lowercase()
                .contains("x-authorization: bearer secret-jwt")
        );
        assert!(request.contains(r#"{"method":"putLights","params":{"ledno":1,"value":true}}"#));
    }

    #[tokio::test]
    async fn should_report_rejected_status() {
        let (client, server) = client_and_server("401 Unauthorized").await;

        let err = client
            .send(&actuator(), LightCommand::new(OutputIndex::ALL[0], false))
            .await
            .unwrap_err();
        server.await.unwrap();

        assert!(matches!(
            err,
            ThingsboardError::Rejected { status: 401, ref reason } if reason == "Unauthorized"
        ));
    }

    #[tokio::test]
    async fn should_report_transport_failure_as_domain_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = RpcActuatorClient::new(ThingsboardConfig {
            host: "127.0.0.1".to_string(),
            port,
            ..ThingsboardConfig::default()
        })
        .unwrap();

        let err = client
            .put_lights(&actuator(), LightCommand::new(OutputIndex::ALL[0], true))
            .await
            .unwrap_err();
        assert!(matches!(err, ClassLightError::Transport(_)));
    }
}
