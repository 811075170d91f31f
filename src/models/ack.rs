use serde::Serialize;
use time::OffsetDateTime;

use crate::errors::CommandRejection;

use super::{CommandStatus, DeviceCommand, DeviceId, Power, SwitchCommand};

/// Acknowledgement for the legacy switch shape.
#[derive(Debug, Clone, Serialize)]
pub struct SwitchAck {
    pub status: CommandStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub received_at: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<Power>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SwitchAck {
    pub fn accepted(command: &SwitchCommand, received_at: OffsetDateTime) -> Self {
        Self {
            status: CommandStatus::Accepted,
            received_at,
            state: Some(command.state),
            reason: None,
        }
    }

    pub fn rejected(reason: CommandRejection, received_at: OffsetDateTime) -> Self {
        Self {
            status: CommandStatus::Rejected,
            received_at,
            state: None,
            reason: Some(reason.to_string()),
        }
    }
}

/// Acknowledgement for the device-targeted shape. Identifying fields are
/// echoed once they have validated; `setpoint` appears only when one was
/// supplied and accepted.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceAck {
    pub status: CommandStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub received_at: OffsetDateTime,
    #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(rename = "deviceId", skip_serializing_if = "Option::is_none")]
    pub device_id: Option<DeviceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<Power>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setpoint: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl DeviceAck {
    pub fn accepted(command: &DeviceCommand, received_at: OffsetDateTime) -> Self {
        Self {
            status: CommandStatus::Accepted,
            received_at,
            request_id: Some(command.request_id.clone()),
            device_id: Some(command.device_id),
            power: Some(command.power),
            setpoint: command.setpoint,
            reason: None,
        }
    }

    pub fn rejected(
        reason: CommandRejection,
        request_id: Option<String>,
        device_id: Option<DeviceId>,
        received_at: OffsetDateTime,
    ) -> Self {
        Self {
            status: CommandStatus::Rejected,
            received_at,
            request_id,
            device_id,
            power: None,
            setpoint: None,
            reason: Some(reason.to_string()),
        }
    }
}
