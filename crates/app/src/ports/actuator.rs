//! Actuator port: delivers a single output command to a remote device.

use std::future::Future;

use classlight_domain::actuator::LightCommand;
use classlight_domain::error::ClassLightError;
use classlight_domain::id::DeviceId;

/// Sends `putLights` commands to an actuator device.
///
/// Implementations live in adapter crates (the platform's RPC endpoint, or
/// the dry-run light bank).
pub trait ActuatorClient: Send + Sync {
    /// Set one output of `device`.
    ///
    /// Resolves once the remote side acknowledged (or refused) the command.
    fn put_lights(
        &self,
        device: &DeviceId,
        command: LightCommand,
    ) -> impl Future<Output = Result<(), ClassLightError>> + Send;
}

impl<T: ActuatorClient> ActuatorClient for std::sync::Arc<T> {
    fn put_lights(
        &self,
        device: &DeviceId,
        command: LightCommand,
    ) -> impl Future<Output = Result<(), ClassLightError>> + Send {
        (**self).put_lights(device, command)
    }
}
