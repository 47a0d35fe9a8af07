//! # classlight-adapter-virtual
//!
//! Virtual light-control board for dry runs and tests.
//!
//! [`VirtualLightBoard`] implements the actuator port by applying each
//! `putLights` command to an in-memory [`LightBank`], exactly as the
//! firmware would drive its four outputs. Nothing leaves the process.
//!
//! ## Dependency rule
//!
//! Depends on `classlight-app` (port traits) and `classlight-domain` only.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use classlight_app::ports::ActuatorClient;
use classlight_domain::actuator::{ActuatorState, LightCommand};
use classlight_domain::error::ClassLightError;
use classlight_domain::id::DeviceId;
use classlight_domain::light_bank::LightBank;

/// Errors raised by the virtual board.
#[derive(Debug, thiserror::Error)]
pub enum VirtualError {
    /// The command was addressed to a device the board does not emulate.
    #[error("no virtual board with id {0}")]
    UnknownDevice(DeviceId),
}

impl From<VirtualError> for ClassLightError {
    fn from(err: VirtualError) -> Self {
        ClassLightError::Transport(Box::new(err))
    }
}

/// A simulated four-output light-control board.
///
/// Clones share the same light bank.
#[derive(Debug, Clone)]
pub struct VirtualLightBoard {
    device: DeviceId,
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    bank: LightBank,
    applied: usize,
}

impl VirtualLightBoard {
    /// Emulate the board registered as `device`. All outputs start off.
    #[must_use]
    pub fn new(device: DeviceId) -> Self {
        Self {
            device,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    #[must_use]
    pub fn device(&self) -> &DeviceId {
        &self.device
    }

    /// Current level of every output.
    #[must_use]
    pub fn state(&self) -> ActuatorState {
        self.lock().bank.state()
    }

    /// Number of commands applied since the board was created.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.lock().applied
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ActuatorClient for VirtualLightBoard {
    async fn put_lights(&self, device: &DeviceId, command: LightCommand) -> Result<(), ClassLightError> {
        if *device != self.device {
            return Err(VirtualError::UnknownDevice(device.clone()).into());
        }

        let state = {
            let mut inner = self.lock();
            inner.bank.apply(command);
            inner.applied += 1;
            inner.bank.state()
        };
        tracing::info!(%device, %command, %state, "virtual board updated");
        Ok(())
    }
}
