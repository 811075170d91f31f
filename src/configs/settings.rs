use std::env;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Serial {
    pub port_path: String,
    pub baud_rate: u32,
    pub reconnect_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gateway {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    pub keep_alive_secs: u64,
    pub auth: Option<GatewayAuth>,
    pub topic: GatewayTopic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayAuth {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayTopic {
    pub sensor: String,
    pub switch_command: String,
    pub switch_ack: String,
    pub device_command: String,
    pub device_ack: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Audit {
    pub log_path: String,
}

/// Window length and hysteresis thresholds for the decision engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Automation {
    pub window_seconds: u64,
    pub fan_on_temp_c: f64,
    pub fan_off_temp_c: f64,
    pub light_on_lux: f64,
    pub light_off_lux: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub serial: Serial,
    pub gateway: Gateway,
    pub device: Device,
    pub audit: Audit,
    pub automation: Option<Automation>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());

        let settings: Settings = Config::builder()
            .add_source(File::with_name("configs/default"))
            .add_source(File::with_name(&format!("configs/{run_mode}")).required(false))
            .add_source(Environment::default().separator("_"))
            .build()?
            .try_deserialize()?;

        settings.validate()?;

        Ok(settings)
    }

    /// Deadband ordering must hold or the engine would chatter at a single
    /// boundary, so a bad threshold pair refuses to start.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(automation) = &self.automation {
            if automation.window_seconds == 0 {
                return Err(ConfigError::Message(
                    "automation.window_seconds must be positive".into(),
                ));
            }
            if automation.fan_off_temp_c >= automation.fan_on_temp_c {
                return Err(ConfigError::Message(
                    "automation requires fan_off_temp_c < fan_on_temp_c".into(),
                ));
            }
            if automation.light_on_lux >= automation.light_off_lux {
                return Err(ConfigError::Message(
                    "automation requires light_on_lux < light_off_lux".into(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn automation() -> Automation {
        Automation {
            window_seconds: 120,
            fan_on_temp_c: 29.0,
            fan_off_temp_c: 27.5,
            light_on_lux: 300.0,
            light_off_lux: 380.0,
        }
    }

    fn settings(automation: Automation) -> Settings {
        Settings {
            logger: Logger {
                level: "info".into(),
            },
            serial: Serial {
                port_path: "/dev/ttyACM0".into(),
                baud_rate: 9600,
                reconnect_delay_ms: 1000,
            },
            gateway: Gateway {
                host: "127.0.0.1".into(),
                port: 1883,
                client_id: "roomlink-bridge".into(),
                keep_alive_secs: 60,
                auth: None,
                topic: GatewayTopic {
                    sensor: "home/pi/sensors/all".into(),
                    switch_command: "home/pi/commands/switch".into(),
                    switch_ack: "home/pi/commands/switch/ack".into(),
                    device_command: "home/pi/commands/device".into(),
                    device_ack: "home/pi/commands/device/ack".into(),
                },
            },
            device: Device { id: "rpi-01".into() },
            audit: Audit {
                log_path: "/tmp/commands.jsonl".into(),
            },
            automation: Some(automation),
        }
    }

    #[test]
    fn test_valid_thresholds_pass() {
        assert!(settings(automation()).validate().is_ok());
    }

    #[test]
    fn test_inverted_fan_thresholds_rejected() {
        let mut bad = automation();
        bad.fan_off_temp_c = 30.0;
        assert!(settings(bad).validate().is_err());
    }

    #[test]
    fn test_inverted_light_thresholds_rejected() {
        let mut bad = automation();
        bad.light_on_lux = 400.0;
        assert!(settings(bad).validate().is_err());
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut bad = automation();
        bad.window_seconds = 0;
        assert!(settings(bad).validate().is_err());
    }
}
