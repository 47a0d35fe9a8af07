//! Light bank: the output side of the light-control board.
//!
//! Each `putLights` command sets exactly one output. All outputs start off.

use crate::actuator::{ActuatorState, LightCommand, OUTPUT_COUNT};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LightBank {
    levels: [bool; OUTPUT_COUNT],
}

impl LightBank {
    /// Apply one command, returning the previous level of that output.
    pub fn apply(&mut self, command: LightCommand) -> bool {
        let slot = &mut self.levels[command.output.as_usize()];
        std::mem::replace(slot, command.on)
    }

    #[must_use]
    pub fn state(&self) -> ActuatorState {
        ActuatorState::new(self.levels)
    }
}
