use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Source tag carried on every telemetry envelope.
pub const TELEMETRY_SOURCE: &str = "arduino-serial";

/// One validated sensor frame from the microcontroller.
///
/// Field names are the serial wire keys and are treated as protocol
/// constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Presence indicator, 0 or 1
    pub pir: u8,
    /// Temperature in degrees Celsius
    pub dht11_temp_c: f64,
    /// Relative humidity in percent
    pub dht11_humidity: f64,
    /// Raw light sensor counts
    pub lm393_raw: u16,
    /// Derived illuminance in lux
    pub lm393_lux: f64,
}

/// Telemetry wrapper published on the sensor topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorEnvelope {
    pub device_id: String,
    pub source: String,
    #[serde(with = "time::serde::rfc3339")]
    pub received_at: OffsetDateTime,
    pub sensors: SensorReading,
}

impl SensorEnvelope {
    pub fn new(device_id: &str, sensors: SensorReading, received_at: OffsetDateTime) -> Self {
        Self {
            device_id: device_id.to_owned(),
            source: TELEMETRY_SOURCE.to_owned(),
            received_at,
            sensors,
        }
    }
}
