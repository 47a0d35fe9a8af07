//! Typed identifier newtypes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Identifier of a remote device on the telemetry platform.
///
/// Opaque to classlight: it is only ever compared and echoed back in URLs
/// and subscription requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Wrap a raw identifier, rejecting empty or whitespace-only input.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyDeviceId`] when `raw` is blank.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyDeviceId);
        }
        if trimmed.len() == raw.len() {
            Ok(Self(raw))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DeviceId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Correlates an inbound streaming frame with the subscription that asked
/// for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandId(u32);

impl CommandId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_reject_empty_device_id() {
        assert_eq!(DeviceId::new(""), Err(ValidationError::EmptyDeviceId));
        assert_eq!(DeviceId::new("   "), Err(ValidationError::EmptyDeviceId));
    }

    #[test]
    fn should_trim_surrounding_whitespace() {
        let id = DeviceId::new(" 937eff80-db80-11e7-adde-d7cf2e1f3808\n").unwrap();
        assert_eq!(id.as_str(), "937eff80-db80-11e7-adde-d7cf2e1f3808");
    }

    #[test]
    fn should_parse_device_id_from_str() {
        let id: DeviceId = "light-board".parse().unwrap();
        assert_eq!(id.to_string(), "light-board");
    }

    #[test]
    fn should_serialize_device_id_as_plain_string() {
        let id = DeviceId::new("abc").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }

    #[test]
    fn should_serialize_command_id_as_plain_number() {
        let parsed: CommandId = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, CommandId::new(3));
        assert_eq!(parsed.get(), 3);
    }
}
