use std::io;

use serde_json::Value;
use time::OffsetDateTime;

use crate::errors::CommandRejection;
use crate::models::{
    AuditEntry, DeviceAck, DeviceCommand, DeviceId, Power, SwitchAck, SwitchCommand,
};
use crate::services::audit_service::AuditService;

pub const AC_SETPOINT_MIN: i64 = 16;
pub const AC_SETPOINT_MAX: i64 = 27;

/// Validates inbound control payloads into acks.
///
/// Both shapes follow the same pipeline: parse, field-validate in a fixed
/// short-circuiting order, construct the ack, write exactly one audit
/// record. Rejections are ordinary outcomes; only an audit write failure
/// propagates as an error.
pub struct CommandService {
    audit: AuditService,
}

impl CommandService {
    pub fn new(audit: AuditService) -> Self {
        Self { audit }
    }

    /// Legacy switch shape: `{"state": "on"|"off"}`.
    pub fn handle_switch(
        &self,
        payload: &str,
        received_at: OffsetDateTime,
    ) -> io::Result<SwitchAck> {
        let value = match serde_json::from_str::<Value>(payload) {
            Ok(value) => value,
            Err(_) => {
                // Preserve the raw text in the audit trail when parsing fails
                return self.reject_switch(
                    Value::String(payload.to_owned()),
                    CommandRejection::InvalidJson,
                    received_at,
                );
            }
        };

        if !value.is_object() {
            return self.reject_switch(value, CommandRejection::NotAnObject, received_at);
        }

        let state = value
            .get("state")
            .and_then(Value::as_str)
            .and_then(Power::parse);
        let Some(state) = state else {
            return self.reject_switch(value, CommandRejection::InvalidState, received_at);
        };

        let command = SwitchCommand { state };
        self.audit
            .append(&AuditEntry::accepted(value, received_at))?;

        Ok(SwitchAck::accepted(&command, received_at))
    }

    /// Device-targeted shape: `{"requestId", "deviceId", "power", "setpoint"?}`.
    ///
    /// Once `deviceId` has validated, every later rejection ack echoes the
    /// request and device identifiers.
    pub fn handle_device(
        &self,
        payload: &str,
        received_at: OffsetDateTime,
    ) -> io::Result<DeviceAck> {
        let value = match serde_json::from_str::<Value>(payload) {
            Ok(value) => value,
            Err(_) => {
                return self.reject_device(
                    Value::String(payload.to_owned()),
                    CommandRejection::InvalidJson,
                    None,
                    None,
                    received_at,
                );
            }
        };

        if !value.is_object() {
            return self.reject_device(value, CommandRejection::NotAnObject, None, None, received_at);
        }

        let request_id = value
            .get("requestId")
            .and_then(Value::as_str)
            .map(|id| id.trim().to_owned())
            .filter(|id| !id.is_empty());
        let Some(request_id) = request_id else {
            return self.reject_device(
                value,
                CommandRejection::InvalidRequestId,
                None,
                None,
                received_at,
            );
        };

        let device_id = value
            .get("deviceId")
            .and_then(Value::as_str)
            .and_then(DeviceId::parse);
        let Some(device_id) = device_id else {
            return self.reject_device(
                value,
                CommandRejection::InvalidDeviceId,
                Some(request_id),
                None,
                received_at,
            );
        };

        let power = value
            .get("power")
            .and_then(Value::as_str)
            .and_then(Power::parse);
        let Some(power) = power else {
            return self.reject_device(
                value,
                CommandRejection::InvalidPower,
                Some(request_id),
                Some(device_id),
                received_at,
            );
        };

        let setpoint = match validate_setpoint(device_id, value.get("setpoint")) {
            Ok(setpoint) => setpoint,
            Err(reason) => {
                return self.reject_device(
                    value,
                    reason,
                    Some(request_id),
                    Some(device_id),
                    received_at,
                );
            }
        };

        let command = DeviceCommand {
            request_id,
            device_id,
            power,
            setpoint,
        };
        self.audit
            .append(&AuditEntry::accepted(value, received_at))?;

        Ok(DeviceAck::accepted(&command, received_at))
    }

    fn reject_switch(
        &self,
        command: Value,
        reason: CommandRejection,
        received_at: OffsetDateTime,
    ) -> io::Result<SwitchAck> {
        self.audit
            .append(&AuditEntry::rejected(command, reason.to_string(), received_at))?;

        Ok(SwitchAck::rejected(reason, received_at))
    }

    fn reject_device(
        &self,
        command: Value,
        reason: CommandRejection,
        request_id: Option<String>,
        device_id: Option<DeviceId>,
        received_at: OffsetDateTime,
    ) -> io::Result<DeviceAck> {
        self.audit
            .append(&AuditEntry::rejected(command, reason.to_string(), received_at))?;

        Ok(DeviceAck::rejected(reason, request_id, device_id, received_at))
    }
}

/// Device-conditional setpoint rule: only the AC accepts one, it must be a
/// non-boolean number, and after rounding (ties away from zero, so 21.5
/// becomes 22) it must sit inside the inclusive [16, 27] band. An absent or
/// null setpoint is always valid.
fn validate_setpoint(
    device_id: DeviceId,
    raw: Option<&Value>,
) -> Result<Option<i64>, CommandRejection> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    if raw.is_null() {
        return Ok(None);
    }

    if device_id != DeviceId::Ac {
        return Err(CommandRejection::SetpointNotSupported);
    }

    let Some(numeric) = raw.as_f64() else {
        return Err(CommandRejection::SetpointNotNumeric);
    };

    let rounded = numeric.round() as i64;
    if !(AC_SETPOINT_MIN..=AC_SETPOINT_MAX).contains(&rounded) {
        return Err(CommandRejection::SetpointOutOfRange);
    }

    Ok(Some(rounded))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_setpoint_absent_or_null_is_valid_for_any_device() {
        assert_eq!(validate_setpoint(DeviceId::Fan, None), Ok(None));
        assert_eq!(validate_setpoint(DeviceId::Ac, None), Ok(None));
        assert_eq!(validate_setpoint(DeviceId::Light, Some(&Value::Null)), Ok(None));
    }

    #[test]
    fn test_setpoint_rejected_for_non_ac_devices() {
        assert_eq!(
            validate_setpoint(DeviceId::Fan, Some(&json!(22))),
            Err(CommandRejection::SetpointNotSupported)
        );
        assert_eq!(
            validate_setpoint(DeviceId::Light, Some(&json!(22))),
            Err(CommandRejection::SetpointNotSupported)
        );
    }

    #[test]
    fn test_setpoint_boolean_is_not_numeric() {
        assert_eq!(
            validate_setpoint(DeviceId::Ac, Some(&json!(true))),
            Err(CommandRejection::SetpointNotNumeric)
        );
        assert_eq!(
            validate_setpoint(DeviceId::Ac, Some(&json!("22"))),
            Err(CommandRejection::SetpointNotNumeric)
        );
    }

    #[test]
    fn test_setpoint_rounds_ties_away_from_zero() {
        assert_eq!(validate_setpoint(DeviceId::Ac, Some(&json!(21.5))), Ok(Some(22)));
        assert_eq!(validate_setpoint(DeviceId::Ac, Some(&json!(26.5))), Ok(Some(27)));
        assert_eq!(validate_setpoint(DeviceId::Ac, Some(&json!(16.4))), Ok(Some(16)));
    }

    #[test]
    fn test_setpoint_range_applies_to_rounded_value() {
        assert_eq!(validate_setpoint(DeviceId::Ac, Some(&json!(15.4))), Err(CommandRejection::SetpointOutOfRange));
        assert_eq!(validate_setpoint(DeviceId::Ac, Some(&json!(15.5))), Ok(Some(16)));
        assert_eq!(validate_setpoint(DeviceId::Ac, Some(&json!(27.4))), Ok(Some(27)));
        assert_eq!(validate_setpoint(DeviceId::Ac, Some(&json!(27.5))), Err(CommandRejection::SetpointOutOfRange));
        assert_eq!(validate_setpoint(DeviceId::Ac, Some(&json!(31))), Err(CommandRejection::SetpointOutOfRange));
    }
}
