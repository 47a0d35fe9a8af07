//! Telemetry stream: the WebSocket connection to ThingsBoard.
//!
//! [`ConnectionManager`] opens the socket, subscribes to the sensor device's
//! latest telemetry and feeds every text frame to the [`Dispatcher`] until
//! the stream ends or shutdown is requested. It never reconnects.

use std::future::Future;

use futures_util::{SinkExt as _, StreamExt as _};
use tokio_tungstenite::tungstenite::Message;

use classlight_app::dispatcher::{Dispatch, Dispatcher};
use classlight_app::ports::CommandSink;
use classlight_domain::connection::ConnectionState;
use classlight_domain::error::ClassLightError;

use crate::config::ThingsboardConfig;
use crate::error::ThingsboardError;
use crate::wire::{InboundFrame, SubscribeRequest};

/// Why the telemetry loop returned without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// The server closed the connection.
    ClosedByPeer,
    /// The caller asked the loop to stop.
    Shutdown,
}

/// Owns the lifecycle of one streaming connection.
pub struct ConnectionManager {
    config: ThingsboardConfig,
    state: ConnectionState,
}

impl ConnectionManager {
    #[must_use]
    pub fn new(config: ThingsboardConfig) -> Self {
        Self {
            config,
            state: ConnectionState::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    fn transition(&mut self, next: ConnectionState) -> Result<(), ThingsboardError> {
        self.state
            .transition(next)
            .map_err(|err| ThingsboardError::Domain(ClassLightError::from(err)))?;
        tracing::debug!(state = %self.state, "telemetry connection state changed");
        Ok(())
    }

    /// Connect, subscribe, and dispatch frames until the stream ends or
    /// `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// - [`ThingsboardError::NotSubscribed`] if the sensor has no command id
    /// - [`ThingsboardError::Connect`] if the handshake fails
    /// - [`ThingsboardError::Stream`] if the socket fails mid-stream
    /// - [`ThingsboardError::Domain`] if called again after the connection ended
    pub async fn run<S: CommandSink>(
        &mut self,
        dispatcher: &Dispatcher<S>,
        shutdown: impl Future<Output = ()>,
    ) -> Result<StreamEnd, ThingsboardError> {
        let sensor = dispatcher.sensor().clone();
        let cmd_id = dispatcher
            .subscriptions()
            .command_id_of(&sensor)
            .ok_or_else(|| ThingsboardError::NotSubscribed(sensor.clone()))?;

        self.transition(ConnectionState::Connecting)?;
        tracing::info!(host = %self.config.host, port = self.config.port, "connecting to telemetry stream");

        let mut socket = match tokio_tungstenite::connect_async(self.config.websocket_url()).await {
            Ok((socket, _response)) => socket,
            Err(err) => {
                self.transition(ConnectionState::Errored)?;
                tracing::error!(%err, "telemetry connection failed");
                return Err(ThingsboardError::Connect(Box::new(err)));
            }
        };
        self.transition(ConnectionState::Connected)?;
        tracing::info!("telemetry stream connected");

        let request = SubscribeRequest::latest_telemetry(cmd_id, sensor.clone())
            .to_text()
            .map_err(ThingsboardError::Encode)?;
        if let Err(err) = socket.send(Message::Text(request)).await {
            self.transition(ConnectionState::Errored)?;
            tracing::warn!(%err, "failed to send subscription");
            return Err(ThingsboardError::Stream(Box::new(err)));
        }
        tracing::info!(device = %sensor, %cmd_id, "subscribed to latest telemetry");

        let mut shutdown = std::pin::pin!(shutdown);
        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("shutdown requested, closing telemetry stream");
                    if let Err(err) = socket.close(None).await {
                        tracing::debug!(%err, "error while closing telemetry stream");
                    }
                    self.transition(ConnectionState::Closed)?;
                    return Ok(StreamEnd::Shutdown);
                }
                message = socket.next() => match message {
                    Some(Ok(Message::Text(text))) => {
                        route_frame(&text, dispatcher);
                    }
                    Some(Ok(Message::Close(frame))) => {
                        tracing::info!(?frame, "telemetry stream closed by server");
                        self.transition(ConnectionState::Closed)?;
                        return Ok(StreamEnd::ClosedByPeer);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        tracing::warn!(%err, "telemetry stream error");
                        self.transition(ConnectionState::Errored)?;
                        return Err(ThingsboardError::Stream(Box::new(err)));
                    }
                    None => {
                        tracing::info!("telemetry stream ended");
                        self.transition(ConnectionState::Closed)?;
                        return Ok(StreamEnd::ClosedByPeer);
                    }
                },
            }
        }
    }
}

/// Decode one text frame and hand it to the dispatcher.
///
/// Unparsable frames and frames without a subscription id are dropped.
pub fn route_frame<S: CommandSink>(text: &str, dispatcher: &Dispatcher<S>) -> Option<Dispatch> {
    let frame = match InboundFrame::parse(text) {
        Ok(frame) => frame,
        Err(err) => {
            tracing::debug!(%err, "dropping unparsable frame");
            return None;
        }
    };

    let Some(cmd_id) = frame.subscription_id else {
        tracing::debug!("dropping frame without subscription id");
        return None;
    };

    if frame.error_code != 0 {
        tracing::warn!(
            %cmd_id,
            error_code = frame.error_code,
            error_msg = frame.error_msg.as_deref().unwrap_or_default(),
            "subscription reported an error"
        );
    }

    Some(dispatcher.dispatch(cmd_id, &frame.data))
}
