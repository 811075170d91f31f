use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::configs::settings::{Gateway, GatewayTopic};
use crate::errors::BridgeError;
use crate::models::{ActuationCommand, SensorEnvelope};
use crate::services::command_service::CommandService;

/// MQTT side of the bridge: telemetry and ack publishing plus command
/// subscription routing.
pub struct GatewayService {
    client: Arc<Mutex<AsyncClient>>,
    event_loop: Arc<Mutex<EventLoop>>,
    topic: GatewayTopic,
}

impl GatewayService {
    pub fn new(gateway: &Gateway) -> Self {
        let mut options = MqttOptions::new(&gateway.client_id, &gateway.host, gateway.port);
        options.set_keep_alive(Duration::from_secs(gateway.keep_alive_secs));

        if let Some(auth) = &gateway.auth {
            options.set_credentials(&auth.username, &auth.password);
        }

        let (client, event_loop) = AsyncClient::new(options, 10);

        Self {
            client: Arc::new(Mutex::new(client)),
            event_loop: Arc::new(Mutex::new(event_loop)),
            topic: gateway.topic.clone(),
        }
    }

    /// Subscribe to both command topics and route inbound publishes to the
    /// command service; every attempt is acked on the matching ack topic.
    ///
    /// An audit write failure stops the routing loop: rejections are
    /// ordinary outcomes, a sink that cannot persist them is not. The
    /// returned handle resolves with that error so the host can exit; it
    /// must not be dropped on the floor, since this task is also the only
    /// poller of the MQTT event loop.
    pub async fn subscribe_commands(
        &self,
        commands: Arc<CommandService>,
    ) -> Result<JoinHandle<BridgeError>, BridgeError> {
        let client = self.client.lock().await;
        client
            .subscribe(self.topic.switch_command.as_str(), QoS::AtLeastOnce)
            .await?;
        client
            .subscribe(self.topic.device_command.as_str(), QoS::AtLeastOnce)
            .await?;
        drop(client);

        tracing::debug!(
            "Subscribed to command topics {} and {}",
            self.topic.switch_command,
            self.topic.device_command,
        );

        let client_clone = Arc::clone(&self.client);
        let event_loop_clone = Arc::clone(&self.event_loop);
        let topic = self.topic.clone();
        let handle = tokio::spawn(async move {
            let mut event_loop = event_loop_clone.lock().await;
            loop {
                match event_loop.poll().await {
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        // Non-UTF-8 payloads degrade to an empty string,
                        // which the validator rejects as malformed
                        let payload =
                            String::from_utf8(publish.payload.to_vec()).unwrap_or_default();

                        if let Err(e) =
                            Self::route(&client_clone, &topic, &commands, &publish.topic, &payload)
                                .await
                        {
                            tracing::error!("Stopping command routing: {}", e);
                            return e;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => tracing::error!("MQTT error: {}", e),
                }
            }
        });

        Ok(handle)
    }

    pub async fn publish_sensor(&self, envelope: &SensorEnvelope) -> Result<(), BridgeError> {
        let payload = serde_json::to_vec(envelope)?;
        self.client
            .lock()
            .await
            .publish(self.topic.sensor.as_str(), QoS::AtLeastOnce, false, payload)
            .await?;

        Ok(())
    }

    pub async fn publish_actuation(&self, command: &ActuationCommand) -> Result<(), BridgeError> {
        let payload = serde_json::to_vec(command)?;
        self.client
            .lock()
            .await
            .publish(
                self.topic.device_command.as_str(),
                QoS::AtLeastOnce,
                false,
                payload,
            )
            .await?;

        Ok(())
    }

    async fn route(
        client: &Arc<Mutex<AsyncClient>>,
        topic: &GatewayTopic,
        commands: &CommandService,
        inbound: &str,
        payload: &str,
    ) -> Result<(), BridgeError> {
        let received_at = OffsetDateTime::now_utc();

        let (ack_topic, ack_json, status) = if inbound == topic.device_command {
            let ack = commands.handle_device(payload, received_at)?;
            (topic.device_ack.as_str(), serde_json::to_vec(&ack)?, ack.status)
        } else {
            let ack = commands.handle_switch(payload, received_at)?;
            (topic.switch_ack.as_str(), serde_json::to_vec(&ack)?, ack.status)
        };

        tracing::info!(
            "Processed command from {} with status={}",
            inbound,
            status.as_str(),
        );

        // An unsendable ack is a transport hiccup, not a reason to stop
        // routing; only the audit sink is load-bearing here
        if let Err(e) = client
            .lock()
            .await
            .publish(ack_topic, QoS::AtLeastOnce, false, ack_json)
            .await
        {
            tracing::warn!("Failed to publish ack to {}: {}", ack_topic, e);
        }

        Ok(())
    }
}
