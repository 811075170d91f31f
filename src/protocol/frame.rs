use serde_json::Value;

use crate::errors::FrameError;
use crate::models::SensorReading;

/// Mandatory frame keys, in canonical order. The first missing or
/// non-numeric key determines the reported error.
pub const REQUIRED_SENSOR_KEYS: [&str; 5] = [
    "pir",
    "dht11_temp_c",
    "dht11_humidity",
    "lm393_raw",
    "lm393_lux",
];

pub const DHT11_TEMP_MIN_C: f64 = 0.0;
pub const DHT11_TEMP_MAX_C: f64 = 50.0;
pub const DHT11_HUMIDITY_MIN: f64 = 20.0;
pub const DHT11_HUMIDITY_MAX: f64 = 90.0;
pub const LM393_RAW_MIN: f64 = 0.0;
pub const LM393_RAW_MAX: f64 = 1023.0;
pub const LM393_LUX_MIN: f64 = 0.0;
pub const LM393_LUX_MAX: f64 = 10000.0;

/// Parse and range-check one serial line into a [`SensorReading`].
///
/// Checks run in a fixed order and the first violation wins: JSON
/// well-formedness, the five required keys (presence then numeric, in
/// canonical order), no unexpected keys, then the inclusive range checks
/// for pir, raw counts, illuminance, temperature and humidity. JSON
/// booleans are not numeric here and are rejected.
pub fn parse_frame(line: &str) -> Result<SensorReading, FrameError> {
    let value: Value = serde_json::from_str(line).map_err(|_| FrameError::InvalidJson)?;
    let map = value.as_object().ok_or(FrameError::NotAnObject)?;

    let mut fields = [0f64; 5];
    for (slot, key) in fields.iter_mut().zip(REQUIRED_SENSOR_KEYS) {
        let raw = map.get(key).ok_or(FrameError::MissingKey(key))?;
        // `Value::as_f64` covers integers and floats but never booleans
        *slot = raw.as_f64().ok_or(FrameError::NonNumeric(key))?;
    }

    if let Some(key) = map.keys().find(|key| !REQUIRED_SENSOR_KEYS.contains(&key.as_str())) {
        return Err(FrameError::UnexpectedKey(key.clone()));
    }

    let [pir, temp_c, humidity, light_raw, lux] = fields;

    if pir != 0.0 && pir != 1.0 {
        return Err(FrameError::InvalidPir);
    }
    check_range("lm393_raw", light_raw, LM393_RAW_MIN, LM393_RAW_MAX)?;
    check_range("lm393_lux", lux, LM393_LUX_MIN, LM393_LUX_MAX)?;
    check_range("dht11_temp_c", temp_c, DHT11_TEMP_MIN_C, DHT11_TEMP_MAX_C)?;
    check_range("dht11_humidity", humidity, DHT11_HUMIDITY_MIN, DHT11_HUMIDITY_MAX)?;

    Ok(SensorReading {
        pir: pir as u8,
        dht11_temp_c: temp_c,
        dht11_humidity: humidity,
        lm393_raw: light_raw as u16,
        lm393_lux: lux,
    })
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), FrameError> {
    if value < min || value > max {
        return Err(FrameError::OutOfRange { field, min, max });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_line() -> String {
        r#"{"pir":1,"dht11_temp_c":24.5,"dht11_humidity":55.0,"lm393_raw":512,"lm393_lux":320.5}"#
            .to_owned()
    }

    #[test]
    fn test_valid_frame_passes_through() {
        let reading = parse_frame(&valid_line()).unwrap();

        assert_eq!(reading.pir, 1);
        assert_eq!(reading.dht11_temp_c, 24.5);
        assert_eq!(reading.dht11_humidity, 55.0);
        assert_eq!(reading.lm393_raw, 512);
        assert_eq!(reading.lm393_lux, 320.5);
    }

    #[test]
    fn test_rejects_invalid_json() {
        assert_eq!(parse_frame("not-json"), Err(FrameError::InvalidJson));
    }

    #[test]
    fn test_rejects_non_object_frame() {
        assert_eq!(parse_frame("[1,2,3]"), Err(FrameError::NotAnObject));
        assert_eq!(parse_frame("42"), Err(FrameError::NotAnObject));
    }

    #[test]
    fn test_first_missing_key_in_canonical_order_wins() {
        // Both pir and lm393_lux are missing; pir is reported
        let result = parse_frame(r#"{"dht11_temp_c":24.5,"dht11_humidity":55.0,"lm393_raw":512}"#);
        assert_eq!(result, Err(FrameError::MissingKey("pir")));

        let result = parse_frame(
            r#"{"pir":0,"dht11_temp_c":24.5,"dht11_humidity":55.0,"lm393_raw":512}"#,
        );
        assert_eq!(result, Err(FrameError::MissingKey("lm393_lux")));
    }

    #[test]
    fn test_rejects_non_numeric_value() {
        let result = parse_frame(
            r#"{"pir":1,"dht11_temp_c":"warm","dht11_humidity":55.0,"lm393_raw":512,"lm393_lux":320.5}"#,
        );
        assert_eq!(result, Err(FrameError::NonNumeric("dht11_temp_c")));
    }

    #[test]
    fn test_rejects_boolean_values_as_non_numeric() {
        let result = parse_frame(
            r#"{"pir":true,"dht11_temp_c":24.5,"dht11_humidity":55.0,"lm393_raw":512,"lm393_lux":320.5}"#,
        );
        assert_eq!(result, Err(FrameError::NonNumeric("pir")));
    }

    #[test]
    fn test_rejects_unexpected_key() {
        let result = parse_frame(
            r#"{"pir":1,"dht11_temp_c":24.5,"dht11_humidity":55.0,"lm393_raw":512,"lm393_lux":320.5,"co2_ppm":410}"#,
        );
        assert_eq!(result, Err(FrameError::UnexpectedKey("co2_ppm".into())));
    }

    #[test]
    fn test_rejects_pir_outside_zero_one() {
        let result = parse_frame(
            r#"{"pir":2,"dht11_temp_c":24.5,"dht11_humidity":55.0,"lm393_raw":512,"lm393_lux":320.5}"#,
        );
        assert_eq!(result, Err(FrameError::InvalidPir));
    }

    #[test]
    fn test_accepts_float_encoded_pir() {
        let reading = parse_frame(
            r#"{"pir":1.0,"dht11_temp_c":24.5,"dht11_humidity":55.0,"lm393_raw":512,"lm393_lux":320.5}"#,
        )
        .unwrap();
        assert_eq!(reading.pir, 1);
    }

    #[test]
    fn test_range_violations_report_field_and_bounds() {
        let result = parse_frame(
            r#"{"pir":1,"dht11_temp_c":24.5,"dht11_humidity":55.0,"lm393_raw":2048,"lm393_lux":320.5}"#,
        );
        assert_eq!(
            result,
            Err(FrameError::OutOfRange {
                field: "lm393_raw",
                min: LM393_RAW_MIN,
                max: LM393_RAW_MAX,
            })
        );

        let result = parse_frame(
            r#"{"pir":1,"dht11_temp_c":55.0,"dht11_humidity":55.0,"lm393_raw":512,"lm393_lux":320.5}"#,
        );
        assert_eq!(
            result,
            Err(FrameError::OutOfRange {
                field: "dht11_temp_c",
                min: DHT11_TEMP_MIN_C,
                max: DHT11_TEMP_MAX_C,
            })
        );

        let result = parse_frame(
            r#"{"pir":1,"dht11_temp_c":24.5,"dht11_humidity":10.0,"lm393_raw":512,"lm393_lux":320.5}"#,
        );
        assert_eq!(
            result,
            Err(FrameError::OutOfRange {
                field: "dht11_humidity",
                min: DHT11_HUMIDITY_MIN,
                max: DHT11_HUMIDITY_MAX,
            })
        );
    }

    #[test]
    fn test_first_range_violation_wins() {
        // Raw counts and temperature both out of range; lm393_raw is
        // checked first
        let result = parse_frame(
            r#"{"pir":1,"dht11_temp_c":60.0,"dht11_humidity":55.0,"lm393_raw":2048,"lm393_lux":320.5}"#,
        );
        assert!(matches!(
            result,
            Err(FrameError::OutOfRange { field: "lm393_raw", .. })
        ));
    }

    #[test]
    fn test_inclusive_bounds_accepted() {
        let reading = parse_frame(
            r#"{"pir":0,"dht11_temp_c":50.0,"dht11_humidity":90.0,"lm393_raw":1023,"lm393_lux":10000.0}"#,
        )
        .unwrap();
        assert_eq!(reading.dht11_temp_c, 50.0);
        assert_eq!(reading.lm393_raw, 1023);
    }
}
