use std::sync::Arc;

use crate::app::create_bridge;
use crate::configs::settings::Settings;
use crate::errors::BridgeError;

pub mod app;
pub mod configs;
pub mod errors;
pub mod models;
pub mod protocol;
pub mod services;

pub async fn run(settings: &Arc<Settings>) -> Result<(), BridgeError> {
    let (bridge, routing) = create_bridge(settings).await?;

    tracing::info!(
        "Bridge started: serial={} gateway={}:{}",
        settings.serial.port_path,
        settings.gateway.host,
        settings.gateway.port,
    );

    // The routing task resolves only when the audit sink failed; without
    // it the event loop has no poller, so its exit must take the process
    // down rather than leave a bridge that can no longer ack or publish
    tokio::select! {
        _ = bridge.run() => Ok(()),
        routing_error = routing => Err(routing_error?),
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping bridge");
            Ok(())
        }
    }
}
