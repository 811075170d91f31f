use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;

use crate::configs::settings::Settings;
use crate::errors::BridgeError;
use crate::models::SensorEnvelope;
use crate::protocol::frame::parse_frame;
use crate::services::audit_service::AuditService;
use crate::services::automation_service::AutomationService;
use crate::services::command_service::CommandService;
use crate::services::gateway_service::GatewayService;
use crate::services::serial_service::SerialService;

pub struct Bridge {
    settings: Arc<Settings>,
    gateway: GatewayService,
    serial: SerialService,
    automation: Option<AutomationService>,
}

/// Builds the service graph. Returns the bridge plus the command routing
/// handle; the routing task resolving means the audit sink failed, which
/// the caller must treat as fatal.
pub async fn create_bridge(
    settings: &Arc<Settings>,
) -> Result<(Bridge, tokio::task::JoinHandle<BridgeError>), BridgeError> {
    let gateway = GatewayService::new(&settings.gateway);

    let audit = AuditService::new(&settings.audit.log_path);
    let commands = Arc::new(CommandService::new(audit));
    let routing = gateway.subscribe_commands(commands).await?;

    let automation = settings.automation.as_ref().map(AutomationService::new);
    if let Some(thresholds) = &settings.automation {
        tracing::info!(
            "Automation enabled: window={}s fan_on={:.2} fan_off={:.2} light_on={:.2} light_off={:.2}",
            thresholds.window_seconds,
            thresholds.fan_on_temp_c,
            thresholds.fan_off_temp_c,
            thresholds.light_on_lux,
            thresholds.light_off_lux,
        );
    }

    let bridge = Bridge {
        settings: Arc::clone(settings),
        gateway,
        serial: SerialService::new(settings.serial.clone()),
        automation,
    };

    Ok((bridge, routing))
}

impl Bridge {
    /// Serial to MQTT ingestion loop: read line, validate the frame,
    /// publish the telemetry envelope, feed the automation engine and
    /// publish any actuation commands it decides. Malformed frames are
    /// dropped with a warning; publish failures never stop ingestion.
    pub async fn run(mut self) {
        loop {
            let Some(line) = self.serial.read_line().await else {
                tokio::time::sleep(Duration::from_millis(50)).await;
                continue;
            };

            let received_at = OffsetDateTime::now_utc();
            let reading = match parse_frame(&line) {
                Ok(reading) => reading,
                Err(e) => {
                    tracing::warn!("Dropped serial frame: {}", e);
                    continue;
                }
            };

            let envelope = SensorEnvelope::new(&self.settings.device.id, reading.clone(), received_at);
            if let Err(e) = self.gateway.publish_sensor(&envelope).await {
                tracing::warn!("Failed to publish sensor payload: {}", e);
            }

            if let Some(automation) = &mut self.automation {
                let commands =
                    automation.observe(reading.dht11_temp_c, reading.lm393_lux, received_at);
                for command in commands {
                    match self.gateway.publish_actuation(&command).await {
                        Ok(()) => tracing::info!(
                            "Published automation command: device={} power={}",
                            command.device_id,
                            command.power,
                        ),
                        Err(e) => tracing::warn!(
                            "Failed to publish automation command for {}: {}",
                            command.device_id,
                            e,
                        ),
                    }
                }
            }
        }
    }
}
