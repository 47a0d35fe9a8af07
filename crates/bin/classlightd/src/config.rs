//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `classlight.toml` in the working directory. Everything except
//! the token and the two device ids has a default, so a minimal file (or
//! environment variables alone) is enough. Environment variables take
//! precedence over file values.

use serde::Deserialize;

use classlight_adapter_thingsboard::ThingsboardConfig;
use classlight_domain::id::DeviceId;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// ThingsBoard instance and credentials.
    pub thingsboard: ThingsboardConfig,
    /// Sensor and actuator device ids.
    pub devices: DevicesConfig,
    /// How light commands are delivered.
    pub actuator: ActuatorConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// The two ThingsBoard devices the bridge connects.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DevicesConfig {
    /// Device publishing Door/Student/Projector/Board telemetry.
    pub sensor: String,
    /// Light-control board receiving `putLights` calls.
    pub actuator: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ActuatorConfig {
    pub mode: ActuatorMode,
}

/// Where light commands go.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActuatorMode {
    /// One-way RPC through ThingsBoard.
    #[default]
    Rpc,
    /// In-memory board; commands are only logged.
    DryRun,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Validated device ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Devices {
    pub sensor: DeviceId,
    pub actuator: DeviceId,
}

impl Config {
    /// Load configuration from `classlight.toml` (if present), apply
    /// environment-variable overrides and validate the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// merged configuration fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("classlight.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("CLASSLIGHT_TB_HOST") {
            self.thingsboard.host = val;
        }
        if let Some(port) = lookup("CLASSLIGHT_TB_PORT").and_then(|val| val.parse().ok()) {
            self.thingsboard.port = port;
        }
        if let Some(val) = lookup("CLASSLIGHT_TB_TOKEN") {
            self.thingsboard.token = val;
        }
        if let Some(tls) = lookup("CLASSLIGHT_TB_TLS").and_then(|val| parse_flag(&val)) {
            self.thingsboard.tls = tls;
        }
        if let Some(val) = lookup("CLASSLIGHT_SENSOR_DEVICE") {
            self.devices.sensor = val;
        }
        if let Some(val) = lookup("CLASSLIGHT_ACTUATOR_DEVICE") {
            self.devices.actuator = val;
        }
        match lookup("CLASSLIGHT_ACTUATOR_MODE").as_deref() {
            Some("rpc") => self.actuator.mode = ActuatorMode::Rpc,
            Some("dry_run" | "dry-run") => self.actuator.mode = ActuatorMode::DryRun,
            _ => {}
        }
        if let Some(val) = lookup("CLASSLIGHT_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.thingsboard.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.thingsboard.token.trim().is_empty() {
            return Err(ConfigError::Validation(
                "thingsboard token must be set".to_string(),
            ));
        }
        self.devices()?;
        Ok(())
    }

    /// Parse the sensor and actuator ids.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when either id is blank or both
    /// name the same device.
    pub fn devices(&self) -> Result<Devices, ConfigError> {
        let sensor = DeviceId::new(&self.devices.sensor)
            .map_err(|_| ConfigError::Validation("sensor device id must be set".to_string()))?;
        let actuator = DeviceId::new(&self.devices.actuator)
            .map_err(|_| ConfigError::Validation("actuator device id must be set".to_string()))?;
        if sensor == actuator {
            return Err(ConfigError::Validation(
                "sensor and actuator must be different devices".to_string(),
            ));
        }
        Ok(Devices { sensor, actuator })
    }
}

fn parse_flag(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "classlight=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
