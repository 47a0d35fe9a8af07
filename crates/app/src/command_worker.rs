//! In-process command queue and the worker that delivers it.
//!
//! The rule engine pushes commands into an unbounded tokio [`mpsc`] channel.
//! The worker spawns one task per command so that a slow actuator never
//! holds back the telemetry loop or the other commands of a batch.
//! Delivery outcomes are only logged.

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle, JoinSet};

use classlight_domain::actuator::LightCommand;
use classlight_domain::id::DeviceId;

use crate::ports::{ActuatorClient, CommandSink};

/// Sending half of the command channel.
///
/// Submitting succeeds even after the worker has stopped (the command is
/// dropped with a warning).
#[derive(Debug, Clone)]
pub struct CommandQueue {
    sender: mpsc::UnboundedSender<LightCommand>,
}

impl CommandSink for CommandQueue {
    fn submit(&self, command: LightCommand) {
        if self.sender.send(command).is_err() {
            tracing::warn!(%command, "command worker stopped, dropping command");
        }
    }
}

/// Delivery totals reported when the worker stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub delivered: usize,
    pub failed: usize,
}

impl WorkerReport {
    fn record(&mut self, outcome: Result<bool, JoinError>) {
        match outcome {
            Ok(true) => self.delivered += 1,
            Ok(false) => self.failed += 1,
            Err(err) => {
                tracing::error!(%err, "actuator command task panicked");
                self.failed += 1;
            }
        }
    }
}

/// Receives commands and issues them against the actuator device.
pub struct CommandWorker<C> {
    client: C,
    actuator: DeviceId,
    receiver: mpsc::UnboundedReceiver<LightCommand>,
}

impl<C> CommandWorker<C>
where
    C: ActuatorClient + Clone + 'static,
{
    /// Create a worker for `actuator` and the queue feeding it.
    pub fn new(client: C, actuator: DeviceId) -> (CommandQueue, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = Self {
            client,
            actuator,
            receiver,
        };
        (CommandQueue { sender }, worker)
    }

    /// Run the worker on the current runtime.
    pub fn spawn(self) -> JoinHandle<WorkerReport> {
        tokio::spawn(self.run())
    }

    /// Deliver commands until every [`CommandQueue`] is dropped, then wait
    /// for the calls still in flight.
    pub async fn run(mut self) -> WorkerReport {
        let mut in_flight = JoinSet::new();
        let mut report = WorkerReport::default();

        while let Some(command) = self.receiver.recv().await {
            in_flight.spawn(deliver(
                self.client.clone(),
                self.actuator.clone(),
                command,
            ));
            while let Some(outcome) = in_flight.try_join_next() {
                report.record(outcome);
            }
        }

        tracing::debug!(pending = in_flight.len(), "command queue closed, draining");
        while let Some(outcome) = in_flight.join_next().await {
            report.record(outcome);
        }

        tracing::info!(
            delivered = report.delivered,
            failed = report.failed,
            "command worker stopped"
        );
        report
    }
}

async fn deliver<C: ActuatorClient>(client: C, actuator: DeviceId, command: LightCommand) -> bool {
    match client.put_lights(&actuator, command).await {
        Ok(()) => {
            tracing::debug!(
                device = %actuator,
                ledno = command.output.get(),
                value = command.on,
                "actuator command accepted"
            );
            true
        }
        Err(err) => {
            tracing::warn!(
                %err,
                device = %actuator,
                ledno = command.output.get(),
                value = command.on,
                "actuator command failed"
            );
            false
        }
    }
}
