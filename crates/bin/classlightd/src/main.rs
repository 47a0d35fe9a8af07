//! # classlightd: classroom lighting bridge daemon
//!
//! Composition root that wires the ThingsBoard adapter, the lighting rules
//! and an actuator client together, then runs the telemetry loop.
//!
//! ## Responsibilities
//! - Load configuration (`classlight.toml`, env vars) and set up logging
//! - Build the subscription table (sensor = 0, actuator = 1)
//! - Pick the actuator client (`rpc` or `dry_run`) and start the command worker
//! - Run the telemetry connection until the stream ends or a signal arrives
//! - Drain in-flight commands before exiting
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use classlight_adapter_thingsboard::{
    ConnectionManager, RpcActuatorClient, StreamEnd, ThingsboardConfig,
};
use classlight_adapter_virtual::VirtualLightBoard;
use classlight_app::command_worker::CommandWorker;
use classlight_app::dispatcher::Dispatcher;
use classlight_app::ports::ActuatorClient;
use classlight_app::rule_engine::RuleEngine;
use classlight_domain::subscription::SubscriptionTable;
use tracing_subscriber::EnvFilter;

use crate::config::{ActuatorMode, Config, Devices};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    let devices = config.devices()?;
    tracing::info!(
        sensor = %devices.sensor,
        actuator = %devices.actuator,
        mode = ?config.actuator.mode,
        "starting classlightd"
    );

    match config.actuator.mode {
        ActuatorMode::Rpc => {
            let client = RpcActuatorClient::new(config.thingsboard.clone())?;
            run(config.thingsboard, devices, client).await
        }
        ActuatorMode::DryRun => {
            let client = VirtualLightBoard::new(devices.actuator.clone());
            run(config.thingsboard, devices, client).await
        }
    }
}

async fn run<C>(
    thingsboard: ThingsboardConfig,
    devices: Devices,
    client: C,
) -> Result<(), Box<dyn std::error::Error>>
where
    C: ActuatorClient + Clone + 'static,
{
    let Devices { sensor, actuator } = devices;

    let subscriptions = SubscriptionTable::from_devices([sensor.clone(), actuator.clone()]);
    let (queue, worker) = CommandWorker::new(client, actuator);
    let worker = worker.spawn();
    let dispatcher = Dispatcher::new(subscriptions, RuleEngine::new(sensor, queue));

    let mut connection = ConnectionManager::new(thingsboard);
    let outcome = connection.run(&dispatcher, shutdown_signal()).await;

    // Dropping the dispatcher drops the last queue handle and lets the worker finish.
    drop(dispatcher);
    let report = worker.await?;
    tracing::info!(
        delivered = report.delivered,
        failed = report.failed,
        "command worker stopped"
    );

    match outcome {
        Ok(StreamEnd::Shutdown) => {
            tracing::info!("classlightd stopped");
            Ok(())
        }
        Ok(StreamEnd::ClosedByPeer) => {
            tracing::warn!("telemetry stream closed by server, not reconnecting");
            Ok(())
        }
        Err(err) => {
            tracing::error!(%err, "telemetry connection failed");
            Err(err.into())
        }
    }
}

/// Resolve on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(%err, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::warn!(%err, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
