use core::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Source tag carried on engine-originated commands.
pub const AUTOMATION_SOURCE: &str = "automation";

/// Controllable devices on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceId {
    #[serde(rename = "fan_01")]
    Fan,
    #[serde(rename = "light_01")]
    Light,
    #[serde(rename = "ac_01")]
    Ac,
}

impl DeviceId {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "fan_01" => Some(Self::Fan),
            "light_01" => Some(Self::Light),
            "ac_01" => Some(Self::Ac),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fan => "fan_01",
            Self::Light => "light_01",
            Self::Ac => "ac_01",
        }
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Power {
    On,
    Off,
}

impl Power {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "on" => Some(Self::On),
            "off" => Some(Self::Off),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Legacy switch request after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchCommand {
    pub state: Power,
}

/// Device-targeted request after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCommand {
    pub request_id: String,
    pub device_id: DeviceId,
    pub power: Power,
    pub setpoint: Option<i64>,
}

/// Engine-originated actuation request published to the device command
/// topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActuationCommand {
    pub request_id: String,
    pub device_id: DeviceId,
    pub power: Power,
    pub source: String,
    #[serde(with = "time::serde::rfc3339")]
    pub sent_at: OffsetDateTime,
}

impl ActuationCommand {
    /// The request id is derived from the device id and the emission
    /// timestamp in unix milliseconds, unique per invocation.
    pub fn automation(device_id: DeviceId, power: Power, sent_at: OffsetDateTime) -> Self {
        let sent_ms = sent_at.unix_timestamp_nanos() / 1_000_000;

        Self {
            request_id: format!("auto-{}-{}", device_id.as_str(), sent_ms),
            device_id,
            power,
            source: AUTOMATION_SOURCE.to_owned(),
            sent_at,
        }
    }
}
