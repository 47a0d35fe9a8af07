//! Dispatcher: routes inbound telemetry frames to the rule engine.
//!
//! Frames only carry the command id of the subscription that produced them.
//! The dispatcher resolves it against the [`SubscriptionTable`], decodes the
//! data section and forwards both to the [`RuleEngine`].

use classlight_domain::id::{CommandId, DeviceId};
use classlight_domain::subscription::SubscriptionTable;
use classlight_domain::telemetry::TelemetryUpdate;

use crate::ports::CommandSink;
use crate::rule_engine::{Evaluation, RuleEngine};

/// Result of dispatching one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The command id matches no subscription; the frame was dropped.
    Unresolved(CommandId),
    /// The frame was routed to the rule engine.
    Routed {
        device: DeviceId,
        evaluation: Evaluation,
    },
}

pub struct Dispatcher<S> {
    subscriptions: SubscriptionTable,
    engine: RuleEngine<S>,
}

impl<S: CommandSink> Dispatcher<S> {
    #[must_use]
    pub fn new(subscriptions: SubscriptionTable, engine: RuleEngine<S>) -> Self {
        Self {
            subscriptions,
            engine,
        }
    }

    #[must_use]
    pub fn subscriptions(&self) -> &SubscriptionTable {
        &self.subscriptions
    }

    /// The device whose telemetry drives the rules.
    #[must_use]
    pub fn sensor(&self) -> &DeviceId {
        self.engine.sensor()
    }

    /// Route the `data` section of a frame tagged with `cmd_id`.
    pub fn dispatch(&self, cmd_id: CommandId, data: &serde_json::Value) -> Dispatch {
        let Some(device) = self.subscriptions.resolve(cmd_id) else {
            tracing::debug!(%cmd_id, "dropping frame for unknown subscription");
            return Dispatch::Unresolved(cmd_id);
        };

        let update = TelemetryUpdate::from_data(data);
        let evaluation = self.engine.process(device, &update);

        Dispatch::Routed {
            device: device.clone(),
            evaluation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule_engine::tests::RecordingSink;
    use serde_json::json;
    use std::sync::Arc;

    fn sensor() -> DeviceId {
        DeviceId::new("classroom").unwrap()
    }

    fn lights() -> DeviceId {
        DeviceId::new("light-control").unwrap()
    }

    fn dispatcher() -> (Dispatcher<Arc<RecordingSink>>, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let table = SubscriptionTable::from_devices([sensor(), lights()]);
        let engine = RuleEngine::new(sensor(), Arc::clone(&sink));
        (Dispatcher::new(table, engine), sink)
    }

    #[test]
    fn should_route_sensor_frame_to_rule_engine() {
        let (dispatcher, sink) = dispatcher();
        let outcome = dispatcher.dispatch(CommandId::new(0), &json!({"Door": [[1, "Open"]]}));

        let Dispatch::Routed { device, evaluation } = outcome else {
            panic!("expected routed frame, got {outcome:?}");
        };
        assert_eq!(device, sensor());
        assert_eq!(evaluation.command_count(), 4);
        assert_eq!(
            sink.taken(),
            vec![(0, true), (1, false), (2, true), (3, false)]
        );
    }

    #[test]
    fn should_drop_frame_with_unknown_command_id() {
        let (dispatcher, sink) = dispatcher();
        let outcome = dispatcher.dispatch(CommandId::new(42), &json!({"Door": [[1, "Open"]]}));
        assert_eq!(outcome, Dispatch::Unresolved(CommandId::new(42)));
        assert!(sink.taken().is_empty());
    }

    #[test]
    fn should_route_but_not_fire_for_actuator_subscription() {
        let (dispatcher, sink) = dispatcher();
        let outcome = dispatcher.dispatch(CommandId::new(1), &json!({"Door": [[1, "Open"]]}));
        assert_eq!(
            outcome,
            Dispatch::Routed {
                device: lights(),
                evaluation: Evaluation::ForeignDevice,
            }
        );
        assert!(sink.taken().is_empty());
    }

    #[test]
    fn should_tolerate_missing_data_section() {
        let (dispatcher, sink) = dispatcher();
        let outcome = dispatcher.dispatch(CommandId::new(0), &serde_json::Value::Null);
        assert_eq!(
            outcome,
            Dispatch::Routed {
                device: sensor(),
                evaluation: Evaluation::Fired(Vec::new()),
            }
        );
        assert!(sink.taken().is_empty());
    }
}
