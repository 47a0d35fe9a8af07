//! Command sink port: hands actuator commands off without waiting for them.

use classlight_domain::actuator::LightCommand;

/// Accepts actuator commands for asynchronous delivery.
///
/// `submit` never blocks and never reports delivery failures; those are
/// logged by whoever performs the call.
pub trait CommandSink {
    fn submit(&self, command: LightCommand);
}

impl<T: CommandSink + ?Sized> CommandSink for std::sync::Arc<T> {
    fn submit(&self, command: LightCommand) {
        (**self).submit(command);
    }
}
