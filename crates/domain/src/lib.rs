//! # classlight-domain
//!
//! Pure domain model for the classlight telemetry-to-lighting bridge.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Decode sensor **telemetry** into per-field enums
//! - Define **actuator** outputs, commands and states
//! - Hold the **rule table** mapping readings to actuator states
//! - Model the **subscription table** and the streaming **connection** lifecycle
//! - Model the actuator's **light bank**
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod actuator;
pub mod connection;
pub mod light_bank;
pub mod rules;
pub mod subscription;
pub mod telemetry;
