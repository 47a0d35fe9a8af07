//! # classlight-adapter-thingsboard
//!
//! ThingsBoard adapter: the only part of classlight that talks to the
//! network.
//!
//! ## Responsibilities
//! - Open the telemetry WebSocket (`/api/ws/plugins/telemetry?token=…`),
//!   subscribe to the sensor device's latest telemetry and feed frames to the
//!   dispatcher ([`ConnectionManager`])
//! - Send `putLights` one-way RPCs to the actuator device
//!   (`POST /api/plugins/rpc/oneway/{deviceId}`, [`RpcActuatorClient`])
//! - Own the wire formats of both APIs ([`wire`])
//!
//! ## Not handled
//! Token refresh, reconnection and retries. A dropped socket ends the
//! bridge; a failed RPC is logged and forgotten.
//!
//! ## Dependency rule
//! Same as other adapters: depends on `classlight-app` and `classlight-domain`.

mod config;
mod error;
mod rpc;
mod telemetry;
pub mod wire;

pub use config::ThingsboardConfig;
pub use error::ThingsboardError;
pub use rpc::RpcActuatorClient;
pub use telemetry::{ConnectionManager, StreamEnd, route_frame};
