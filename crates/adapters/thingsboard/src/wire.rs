//! ThingsBoard wire formats.
//!
//! - Telemetry subscription command sent over the WebSocket
//! - Inbound telemetry frames
//! - `putLights` one-way RPC body
//!
//! ```json
//! {"tsSubCmds":[{"entityType":"DEVICE","entityId":"…","scope":"LATEST_TELEMETRY","cmdId":0}],
//!  "historyCmds":[],"attrSubCmds":[]}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use classlight_domain::actuator::{LightCommand, OutputIndex};
use classlight_domain::id::{CommandId, DeviceId};

/// Name of the RPC method understood by the light-control firmware.
pub const PUT_LIGHTS: &str = "putLights";

/// Subscription command frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub ts_sub_cmds: Vec<TsSubCmd>,
    pub history_cmds: Vec<Value>,
    pub attr_sub_cmds: Vec<Value>,
}

/// One time-series subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TsSubCmd {
    pub entity_type: &'static str,
    pub entity_id: DeviceId,
    pub scope: &'static str,
    pub cmd_id: CommandId,
}

impl SubscribeRequest {
    /// Subscribe to the latest telemetry of `device` under `cmd_id`.
    #[must_use]
    pub fn latest_telemetry(cmd_id: CommandId, device: DeviceId) -> Self {
        Self {
            ts_sub_cmds: vec![TsSubCmd {
                entity_type: "DEVICE",
                entity_id: device,
                scope: "LATEST_TELEMETRY",
                cmd_id,
            }],
            history_cmds: Vec::new(),
            attr_sub_cmds: Vec::new(),
        }
    }

    /// Encode as a WebSocket text payload.
    ///
    /// # Errors
    ///
    /// Returns the serializer error (only possible for non-string map keys,
    /// which this type never produces).
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Telemetry update pushed by ThingsBoard for an active subscription.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundFrame {
    /// Command id of the subscription; absent on frames that are not
    /// subscription updates.
    pub subscription_id: Option<CommandId>,
    #[serde(default)]
    pub error_code: i64,
    #[serde(default)]
    pub error_msg: Option<String>,
    /// Field name → `[[timestamp, value], …]`.
    #[serde(default)]
    pub data: Value,
}

impl InboundFrame {
    /// Parse a WebSocket text payload.
    ///
    /// # Errors
    ///
    /// Returns the parser error when the text is not a JSON object of the
    /// expected shape.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Body of `POST /api/plugins/rpc/oneway/{deviceId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub method: String,
    pub params: PutLightsParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutLightsParams {
    pub ledno: OutputIndex,
    pub value: bool,
}

impl From<LightCommand> for RpcRequest {
    fn from(command: LightCommand) -> Self {
        Self {
            method: PUT_LIGHTS.to_string(),
            params: PutLightsParams {
                ledno: command.output,
                value: command.on,
            },
        }
    }
}

impl RpcRequest {
    /// Recover the command carried by a `putLights` request, as the
    /// light-control firmware does.
    ///
    /// Returns `None` for any other method.
    #[must_use]
    pub fn as_command(&self) -> Option<LightCommand> {
        (self.method == PUT_LIGHTS)
            .then(|| LightCommand::new(self.params.ledno, self.params.value))
    }
}
