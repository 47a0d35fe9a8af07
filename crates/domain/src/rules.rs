//! Lighting rules: map each telemetry reading to a full actuator state.
//!
//! Every rule rewrites all four outputs, so when several fields arrive in
//! one update the last evaluated field decides the final physical state.
//!
//! | Reading | Out0 | Out1 | Out2 | Out3 |
//! |---------|------|------|------|------|
//! | Door open | 1 | 0 | 1 | 0 |
//! | Students absent | 0 | 0 | 0 | 0 |
//! | Projector on | 1 | 1 | 0 | 1 |
//! | Lecturer writing | 1 | 0 | 1 | 1 |
//! | anything else | 1 | 1 | 1 | 0 |

use crate::actuator::ActuatorState;
use crate::telemetry::{
    BoardState, DoorState, FieldReading, Occupancy, ProjectorState, TelemetryUpdate,
};

/// Classroom at rest: room lights on, projector off.
pub const RESTING: ActuatorState = ActuatorState::new([true, true, true, false]);

const DOOR_OPEN: ActuatorState = ActuatorState::new([true, false, true, false]);
const ROOM_EMPTY: ActuatorState = ActuatorState::new([false, false, false, false]);
const PROJECTING: ActuatorState = ActuatorState::new([true, true, false, true]);
const WRITING: ActuatorState = ActuatorState::new([true, false, true, true]);

/// The actuator state one reading asks for.
#[must_use]
pub const fn actuator_state(reading: FieldReading) -> ActuatorState {
    match reading {
        FieldReading::Door(DoorState::Open) => DOOR_OPEN,
        FieldReading::Student(Occupancy::Absent) => ROOM_EMPTY,
        FieldReading::Projector(ProjectorState::On) => PROJECTING,
        FieldReading::Board(BoardState::Writing) => WRITING,
        FieldReading::Door(DoorState::Closed)
        | FieldReading::Student(Occupancy::Present)
        | FieldReading::Projector(ProjectorState::Off)
        | FieldReading::Board(BoardState::Idle) => RESTING,
    }
}

/// Evaluate every reading of an update independently, in update order.
#[must_use]
pub fn evaluate(update: &TelemetryUpdate) -> Vec<ActuatorState> {
    update.readings().map(actuator_state).collect()
}
