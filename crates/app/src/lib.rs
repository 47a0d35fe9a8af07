//! # classlight-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `ActuatorClient`: deliver one output command to the actuator device
//!   - `CommandSink`: accept commands without waiting for delivery
//! - Route inbound telemetry frames through the **dispatcher** to the
//!   **rule engine**
//! - Provide **in-process infrastructure** (command queue and worker) that
//!   doesn't need IO
//!
//! ## Dependency rule
//! Depends on `classlight-domain` only (plus `tokio` for channels and tasks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod command_worker;
pub mod dispatcher;
pub mod ports;
pub mod rule_engine;
