/// Rejection reasons for inbound control payloads.
///
/// The display strings are part of the bus protocol: they are echoed in
/// acks and persisted verbatim in audit records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CommandRejection {
    #[error("Invalid JSON payload")]
    InvalidJson,

    #[error("Command payload must be a JSON object")]
    NotAnObject,

    #[error("Invalid state, expected 'on' or 'off'")]
    InvalidState,

    #[error("Invalid requestId")]
    InvalidRequestId,

    #[error("Invalid deviceId")]
    InvalidDeviceId,

    #[error("Invalid power, expected 'on' or 'off'")]
    InvalidPower,

    #[error("setpoint is only valid for ac_01")]
    SetpointNotSupported,

    #[error("AC setpoint must be numeric")]
    SetpointNotNumeric,

    #[error("AC setpoint must be in range 16-27")]
    SetpointOutOfRange,
}
