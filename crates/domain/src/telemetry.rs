//! Telemetry readings published by the classroom sensor board.
//!
//! The platform delivers each field as a list of `[timestamp, value]` pairs
//! with string-encoded values. They are decoded here, once, into one enum per
//! field so that the rule table never compares raw strings.
//!
//! Decoding is total: a present field always yields a reading. Values that
//! are empty, non-string or simply unexpected decode to the field's resting
//! state (closed door, students present, projector off, board idle).

use std::fmt;

use serde_json::Value;

use crate::time::{self, Timestamp};

/// The telemetry keys the lighting rules react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TelemetryField {
    Door,
    Student,
    Projector,
    Board,
}

impl TelemetryField {
    /// Every field, in evaluation order.
    pub const ALL: [Self; 4] = [Self::Door, Self::Student, Self::Projector, Self::Board];

    /// Key used by the sensor board when publishing this field.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Door => "Door",
            Self::Student => "Student",
            Self::Projector => "Projector",
            Self::Board => "Board",
        }
    }

    /// Decode a raw value for this field.
    #[must_use]
    pub fn decode(self, raw: Option<&str>) -> FieldReading {
        let raw = raw.unwrap_or_default();
        match self {
            Self::Door => FieldReading::Door(if raw == "Open" {
                DoorState::Open
            } else {
                DoorState::Closed
            }),
            Self::Student => FieldReading::Student(if raw == "Absent" {
                Occupancy::Absent
            } else {
                Occupancy::Present
            }),
            Self::Projector => FieldReading::Projector(if raw == "On" {
                ProjectorState::On
            } else {
                ProjectorState::Off
            }),
            Self::Board => FieldReading::Board(if raw == "Writing" {
                BoardState::Writing
            } else {
                BoardState::Idle
            }),
        }
    }
}

impl fmt::Display for TelemetryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorState {
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupancy {
    Present,
    Absent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectorState {
    On,
    Off,
}

/// Whether the lecturer is writing on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardState {
    Writing,
    Idle,
}

/// A decoded value for one telemetry field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldReading {
    Door(DoorState),
    Student(Occupancy),
    Projector(ProjectorState),
    Board(BoardState),
}

impl FieldReading {
    /// The field this reading belongs to.
    #[must_use]
    pub const fn field(self) -> TelemetryField {
        match self {
            Self::Door(_) => TelemetryField::Door,
            Self::Student(_) => TelemetryField::Student,
            Self::Projector(_) => TelemetryField::Projector,
            Self::Board(_) => TelemetryField::Board,
        }
    }
}

impl fmt::Display for FieldReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Self::Door(DoorState::Open) => "open",
            Self::Door(DoorState::Closed) => "closed",
            Self::Student(Occupancy::Present) => "present",
            Self::Student(Occupancy::Absent) => "absent",
            Self::Projector(ProjectorState::On) => "on",
            Self::Projector(ProjectorState::Off) => "off",
            Self::Board(BoardState::Writing) => "writing",
            Self::Board(BoardState::Idle) => "idle",
        };
        write!(f, "{}={value}", self.field())
    }
}

/// One decoded reading together with the time the platform recorded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub reading: FieldReading,
    pub observed_at: Option<Timestamp>,
}

/// All recognised readings carried by one inbound data section, in
/// evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetryUpdate {
    samples: Vec<Sample>,
}

impl TelemetryUpdate {
    /// Decode the `data` section of a telemetry frame.
    ///
    /// Fields are tested by key presence only. Unknown keys are ignored and a
    /// non-object section yields an empty update.
    #[must_use]
    pub fn from_data(data: &Value) -> Self {
        let Some(map) = data.as_object() else {
            return Self::default();
        };

        let samples = TelemetryField::ALL
            .into_iter()
            .filter_map(|field| {
                let series = map.get(field.key())?;
                let (observed_at, raw) = first_pair(series);
                Some(Sample {
                    reading: field.decode(raw),
                    observed_at,
                })
            })
            .collect();

        Self { samples }
    }

    /// Build an update directly from readings, keeping their order.
    #[must_use]
    pub fn from_readings(readings: impl IntoIterator<Item = FieldReading>) -> Self {
        Self {
            samples: readings
                .into_iter()
                .map(|reading| Sample {
                    reading,
                    observed_at: None,
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn readings(&self) -> impl Iterator<Item = FieldReading> + '_ {
        self.samples.iter().map(|sample| sample.reading)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Extract the timestamp and string value of the first `[ts, value]` pair.
///
/// The platform lists pairs newest first.
fn first_pair(series: &Value) -> (Option<Timestamp>, Option<&str>) {
    let Some(pair) = series.as_array().and_then(|pairs| pairs.first()) else {
        return (None, None);
    };
    let observed_at = pair.get(0).and_then(Value::as_i64).and_then(time::from_millis);
    let raw = pair.get(1).and_then(Value::as_str);
    (observed_at, raw)
}
