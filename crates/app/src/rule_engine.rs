//! Rule engine: turns sensor telemetry into actuator commands.
//!
//! For each update from the sensor device, every recognised field is
//! evaluated on its own and produces a full four-command batch. Batches are
//! handed to a [`CommandSink`] and never awaited here.

use classlight_domain::actuator::ActuatorState;
use classlight_domain::id::DeviceId;
use classlight_domain::rules;
use classlight_domain::telemetry::TelemetryUpdate;

use crate::ports::CommandSink;

/// What the engine did with one update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// The update did not come from the sensor device.
    ForeignDevice,
    /// One actuator state per recognised field, in evaluation order.
    Fired(Vec<ActuatorState>),
}

impl Evaluation {
    /// Number of commands submitted for this evaluation.
    #[must_use]
    pub fn command_count(&self) -> usize {
        match self {
            Self::ForeignDevice => 0,
            Self::Fired(states) => states.len() * classlight_domain::actuator::OUTPUT_COUNT,
        }
    }
}

/// Stateless evaluator bound to the configured sensor device.
pub struct RuleEngine<S> {
    sensor: DeviceId,
    sink: S,
}

impl<S: CommandSink> RuleEngine<S> {
    /// Create an engine reacting to telemetry from `sensor`.
    pub fn new(sensor: DeviceId, sink: S) -> Self {
        Self { sensor, sink }
    }

    #[must_use]
    pub fn sensor(&self) -> &DeviceId {
        &self.sensor
    }

    /// Evaluate one update from `device` and submit the resulting commands.
    pub fn process(&self, device: &DeviceId, update: &TelemetryUpdate) -> Evaluation {
        if *device != self.sensor {
            tracing::debug!(%device, "ignoring telemetry from non-sensor device");
            return Evaluation::ForeignDevice;
        }

        let mut states = Vec::with_capacity(update.samples().len());
        for reading in update.readings() {
            let state = rules::actuator_state(reading);
            tracing::info!(%device, %reading, %state, "lighting rule fired");
            for command in state.commands() {
                self.sink.submit(command);
            }
            states.push(state);
        }

        if states.is_empty() {
            tracing::debug!(%device, "telemetry carried no recognised fields");
        }

        Evaluation::Fired(states)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use classlight_domain::actuator::LightCommand;
    use serde_json::json;
    use std::sync::Mutex;

    // ── Recording sink ─────────────────────────────────────────────

    #[derive(Default)]
    pub(crate) struct RecordingSink {
        commands: Mutex<Vec<LightCommand>>,
    }

    impl RecordingSink {
        pub(crate) fn taken(&self) -> Vec<(u8, bool)> {
            self.commands
                .lock()
                .unwrap()
                .iter()
                .map(|c| (c.output.get(), c.on))
                .collect()
        }
    }

    impl CommandSink for RecordingSink {
        fn submit(&self, command: LightCommand) {
            self.commands.lock().unwrap().push(command);
        }
    }

    // ── Helpers ────────────────────────────────────────────────────

    fn sensor() -> DeviceId {
        DeviceId::new("937eff80-db80-11e7-adde-d7cf2e1f3808").unwrap()
    }

    fn engine() -> RuleEngine<RecordingSink> {
        RuleEngine::new(sensor(), RecordingSink::default())
    }

    fn run(engine: &RuleEngine<RecordingSink>, data: serde_json::Value) -> Vec<(u8, bool)> {
        engine.process(&sensor(), &TelemetryUpdate::from_data(&data));
        engine.sink.taken()
    }

    // ── Tests ──────────────────────────────────────────────────────

    #[test]
    fn should_issue_door_open_batch() {
        let cmds = run(&engine(), json!({"Door": [[1, "Open"]]}));
        assert_eq!(cmds, vec![(0, true), (1, false), (2, true), (3, false)]);
    }

    #[test]
    fn should_issue_student_absent_batch() {
        let cmds = run(&engine(), json!({"Student": [[1, "Absent"]]}));
        assert_eq!(cmds, vec![(0, false), (1, false), (2, false), (3, false)]);
    }

    #[test]
    fn should_issue_projector_on_batch() {
        let cmds = run(&engine(), json!({"Projector": [[1, "On"]]}));
        assert_eq!(cmds, vec![(0, true), (1, true), (2, false), (3, true)]);
    }

    #[test]
    fn should_issue_board_writing_batch() {
        let cmds = run(&engine(), json!({"Board": [[1, "Writing"]]}));
        assert_eq!(cmds, vec![(0, true), (1, false), (2, true), (3, true)]);
    }

    #[test]
    fn should_issue_resting_batch_for_else_branches() {
        for data in [
            json!({"Door": [[1, "Close"]]}),
            json!({"Student": [[1, "Present"]]}),
            json!({"Projector": [[1, "Off"]]}),
            json!({"Board": [[1, "NoWrite"]]}),
            json!({"Board": [[1, ""]]}),
        ] {
            let cmds = run(&engine(), data);
            assert_eq!(cmds, vec![(0, true), (1, true), (2, true), (3, false)]);
        }
    }

    #[test]
    fn should_issue_one_batch_per_field_in_field_order() {
        let engine = engine();
        let evaluation = engine.process(
            &sensor(),
            &TelemetryUpdate::from_data(&json!({
                "Projector": [[1, "On"]],
                "Door": [[1, "Open"]],
            })),
        );
        assert_eq!(evaluation.command_count(), 8);
        assert_eq!(
            engine.sink.taken(),
            vec![
                (0, true),
                (1, false),
                (2, true),
                (3, false),
                (0, true),
                (1, true),
                (2, false),
                (3, true),
            ]
        );
    }

    #[test]
    fn should_issue_nothing_without_recognised_fields() {
        let engine = engine();
        let evaluation = engine.process(
            &sensor(),
            &TelemetryUpdate::from_data(&json!({"temperature": [[1, "20"]]})),
        );
        assert_eq!(evaluation, Evaluation::Fired(Vec::new()));
        assert!(engine.sink.taken().is_empty());
    }

    #[test]
    fn should_ignore_telemetry_from_other_devices() {
        let engine = engine();
        let other = DeviceId::new("2d64b610-e006-11e7-b5ba-d7cf2e1f3808").unwrap();
        let evaluation = engine.process(
            &other,
            &TelemetryUpdate::from_data(&json!({"Door": [[1, "Open"]]})),
        );
        assert_eq!(evaluation, Evaluation::ForeignDevice);
        assert_eq!(evaluation.command_count(), 0);
        assert!(engine.sink.taken().is_empty());
    }
}
