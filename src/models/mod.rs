mod ack;
mod audit;
mod command;
mod reading;

pub use ack::{DeviceAck, SwitchAck};
pub use audit::{AuditEntry, CommandStatus};
pub use command::{
    ActuationCommand, AUTOMATION_SOURCE, DeviceCommand, DeviceId, Power, SwitchCommand,
};
pub use reading::{SensorEnvelope, SensorReading, TELEMETRY_SOURCE};
