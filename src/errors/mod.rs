pub mod command;
pub mod frame;

pub use command::CommandRejection;
pub use frame::FrameError;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("MQTT client error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    #[error("Audit log error: {0}")]
    Audit(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Command routing task failed: {0}")]
    Routing(#[from] tokio::task::JoinError),
}
