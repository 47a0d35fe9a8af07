//! Actuator outputs and the commands that drive them.
//!
//! The light-control board exposes four outputs:
//!
//! | Index | Output |
//! |-------|--------|
//! | 0 | Lights towards the students |
//! | 1 | Lights towards the blackboard |
//! | 2 | Lights towards the podium |
//! | 3 | Projector |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of outputs on the light-control board.
pub const OUTPUT_COUNT: usize = 4;

/// A validated output index in `0..OUTPUT_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct OutputIndex(u8);

impl OutputIndex {
    /// All outputs, in index order.
    pub const ALL: [Self; OUTPUT_COUNT] = [Self(0), Self(1), Self(2), Self(3)];

    /// # Errors
    ///
    /// Returns [`ValidationError::OutputOutOfRange`] for indices above 3.
    pub fn new(index: u32) -> Result<Self, ValidationError> {
        match u8::try_from(index) {
            Ok(idx) if usize::from(idx) < OUTPUT_COUNT => Ok(Self(idx)),
            _ => Err(ValidationError::OutputOutOfRange(index)),
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn as_usize(self) -> usize {
        usize::from(self.0)
    }
}

impl TryFrom<u32> for OutputIndex {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OutputIndex> for u32 {
    fn from(index: OutputIndex) -> Self {
        u32::from(index.0)
    }
}

impl fmt::Display for OutputIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Set one actuator output to a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LightCommand {
    pub output: OutputIndex,
    pub on: bool,
}

impl LightCommand {
    #[must_use]
    pub const fn new(output: OutputIndex, on: bool) -> Self {
        Self { output, on }
    }
}

impl fmt::Display for LightCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "led{}={}", self.output, if self.on { "on" } else { "off" })
    }
}

/// Desired level of every actuator output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActuatorState([bool; OUTPUT_COUNT]);

impl ActuatorState {
    #[must_use]
    pub const fn new(levels: [bool; OUTPUT_COUNT]) -> Self {
        Self(levels)
    }

    #[must_use]
    pub const fn levels(self) -> [bool; OUTPUT_COUNT] {
        self.0
    }

    #[must_use]
    pub fn level(self, output: OutputIndex) -> bool {
        self.0[output.as_usize()]
    }

    /// One command per output, in index order.
    pub fn commands(self) -> impl Iterator<Item = LightCommand> {
        OutputIndex::ALL
            .into_iter()
            .map(move |output| LightCommand::new(output, self.level(output)))
    }
}

impl fmt::Display for ActuatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for level in self.0 {
            f.write_str(if level { "1" } else { "0" })?;
        }
        Ok(())
    }
}
