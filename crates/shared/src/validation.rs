//! Common validation utilities for sensor measurements.

use chrono::{TimeZone, Utc};
use validator::ValidationError;

/// Maximum allowed future timestamp tolerance in seconds (5 minutes for clock skew).
const MAX_FUTURE_TOLERANCE_SECS: i64 = 300;

/// Physical ceiling for solar irradiance in W/m².
const MAX_IRRADIANCE_W_M2: f64 = 1500.0;

/// Validates that solar irradiance is within physical range (0 to 1500 W/m²).
pub fn validate_irradiance(irradiance: f64) -> Result<(), ValidationError> {
    if (0.0..=MAX_IRRADIANCE_W_M2).contains(&irradiance) {
        Ok(())
    } else {
        let mut err = ValidationError::new("irradiance_range");
        err.message = Some("Irradiance must be between 0 and 1500 W/m²".into());
        Err(err)
    }
}

/// Validates that a temperature reading is plausible (-60 to 150 °C).
pub fn validate_temperature(temp: f64) -> Result<(), ValidationError> {
    if (-60.0..=150.0).contains(&temp) {
        Ok(())
    } else {
        let mut err = ValidationError::new("temperature_range");
        err.message = Some("Temperature must be between -60 and 150 °C".into());
        Err(err)
    }
}

/// Validates that relative humidity is within 0 to 100 %.
pub fn validate_humidity(humidity: f64) -> Result<(), ValidationError> {
    if (0.0..=100.0).contains(&humidity) {
        Ok(())
    } else {
        let mut err = ValidationError::new("humidity_range");
        err.message = Some("Humidity must be between 0 and 100 %".into());
        Err(err)
    }
}

/// Validates that wind speed is non-negative.
pub fn validate_wind_speed(speed: f64) -> Result<(), ValidationError> {
    if speed >= 0.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("wind_speed_range");
        err.message = Some("Wind speed must be non-negative".into());
        Err(err)
    }
}

/// Validates that a power reading is non-negative.
pub fn validate_power(power_kw: f64) -> Result<(), ValidationError> {
    if power_kw >= 0.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("power_range");
        err.message = Some("Power output must be non-negative".into());
        Err(err)
    }
}

/// Validates that a voltage reading is non-negative.
pub fn validate_voltage(voltage: f64) -> Result<(), ValidationError> {
    if voltage >= 0.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("voltage_range");
        err.message = Some("Voltage must be non-negative".into());
        Err(err)
    }
}

/// Validates that a current reading is non-negative.
pub fn validate_current(current: f64) -> Result<(), ValidationError> {
    if current >= 0.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("current_range");
        err.message = Some("Current must be non-negative".into());
        Err(err)
    }
}

/// Validates that AC frequency is within a plausible grid range (40 to 70 Hz).
pub fn validate_frequency(frequency: f64) -> Result<(), ValidationError> {
    if (40.0..=70.0).contains(&frequency) {
        Ok(())
    } else {
        let mut err = ValidationError::new("frequency_range");
        err.message = Some("Frequency must be between 40 and 70 Hz".into());
        Err(err)
    }
}

/// Validates that rated capacity is strictly positive.
pub fn validate_capacity(capacity_kw: f64) -> Result<(), ValidationError> {
    if capacity_kw > 0.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("capacity_range");
        err.message = Some("Rated capacity must be positive".into());
        Err(err)
    }
}

/// Validates that panel area is strictly positive.
pub fn validate_panel_area(area_m2: f64) -> Result<(), ValidationError> {
    if area_m2 > 0.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("panel_area_range");
        err.message = Some("Panel area must be positive".into());
        Err(err)
    }
}

/// Validates that a latitude value is within valid range (-90 to 90).
pub fn validate_latitude(lat: f64) -> Result<(), ValidationError> {
    if (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        let mut err = ValidationError::new("latitude_range");
        err.message = Some("Latitude must be between -90 and 90".into());
        Err(err)
    }
}

/// Validates that a longitude value is within valid range (-180 to 180).
pub fn validate_longitude(lon: f64) -> Result<(), ValidationError> {
    if (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        let mut err = ValidationError::new("longitude_range");
        err.message = Some("Longitude must be between -180 and 180".into());
        Err(err)
    }
}

/// Validates a device-supplied timestamp (milliseconds since epoch).
///
/// Must parse to a valid instant and must not be more than 5 minutes in the
/// future (clock skew tolerance). Out-of-order timestamps are a pipeline
/// policy decision, not a validation failure, so no lower bound is applied.
pub fn validate_timestamp(timestamp_millis: i64) -> Result<(), ValidationError> {
    let timestamp = match Utc.timestamp_millis_opt(timestamp_millis).single() {
        Some(ts) => ts,
        None => {
            let mut err = ValidationError::new("timestamp_invalid");
            err.message = Some("Invalid timestamp format".into());
            return Err(err);
        }
    };

    let future_limit = Utc::now() + chrono::Duration::seconds(MAX_FUTURE_TOLERANCE_SECS);
    if timestamp > future_limit {
        let mut err = ValidationError::new("timestamp_future");
        err.message = Some("Timestamp cannot be in the future".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_irradiance() {
        assert!(validate_irradiance(0.0).is_ok());
        assert!(validate_irradiance(850.0).is_ok());
        assert!(validate_irradiance(1500.0).is_ok());
        assert!(validate_irradiance(-1.0).is_err());
        assert!(validate_irradiance(2000.0).is_err());
    }

    #[test]
    fn test_validate_temperature() {
        assert!(validate_temperature(25.0).is_ok());
        assert!(validate_temperature(-60.0).is_ok());
        assert!(validate_temperature(150.0).is_ok());
        assert!(validate_temperature(-61.0).is_err());
        assert!(validate_temperature(151.0).is_err());
    }

    #[test]
    fn test_validate_humidity() {
        assert!(validate_humidity(0.0).is_ok());
        assert!(validate_humidity(55.5).is_ok());
        assert!(validate_humidity(100.0).is_ok());
        assert!(validate_humidity(-0.1).is_err());
        assert!(validate_humidity(100.1).is_err());
    }

    #[test]
    fn test_validate_wind_speed() {
        assert!(validate_wind_speed(0.0).is_ok());
        assert!(validate_wind_speed(12.3).is_ok());
        assert!(validate_wind_speed(-1.0).is_err());
    }

    #[test]
    fn test_validate_power() {
        assert!(validate_power(0.0).is_ok());
        assert!(validate_power(4.2).is_ok());
        assert!(validate_power(-0.5).is_err());
    }

    #[test]
    fn test_validate_voltage_and_current() {
        assert!(validate_voltage(230.0).is_ok());
        assert!(validate_voltage(-1.0).is_err());
        assert!(validate_current(8.7).is_ok());
        assert!(validate_current(-0.1).is_err());
    }

    #[test]
    fn test_validate_frequency() {
        assert!(validate_frequency(50.0).is_ok());
        assert!(validate_frequency(60.0).is_ok());
        assert!(validate_frequency(39.9).is_err());
        assert!(validate_frequency(70.1).is_err());
    }

    #[test]
    fn test_validate_capacity_and_area() {
        assert!(validate_capacity(5.0).is_ok());
        assert!(validate_capacity(0.0).is_err());
        assert!(validate_panel_area(25.0).is_ok());
        assert!(validate_panel_area(-25.0).is_err());
    }

    #[test]
    fn test_validate_latitude() {
        assert!(validate_latitude(0.0).is_ok());
        assert!(validate_latitude(90.0).is_ok());
        assert!(validate_latitude(-90.0).is_ok());
        assert!(validate_latitude(90.1).is_err());
    }

    #[test]
    fn test_validate_longitude() {
        assert!(validate_longitude(180.0).is_ok());
        assert!(validate_longitude(-180.0).is_ok());
        assert!(validate_longitude(180.5).is_err());
    }

    #[test]
    fn test_validate_timestamp_current() {
        let now_millis = Utc::now().timestamp_millis();
        assert!(validate_timestamp(now_millis).is_ok());
    }

    #[test]
    fn test_validate_timestamp_past_allowed() {
        // Out-of-order handling is pipeline policy; old timestamps pass validation
        let old = Utc::now().timestamp_millis() - 30 * 24 * 3600 * 1000;
        assert!(validate_timestamp(old).is_ok());
    }

    #[test]
    fn test_validate_timestamp_far_future_rejected() {
        let future = Utc::now().timestamp_millis() + 3600 * 1000;
        assert!(validate_timestamp(future).is_err());
    }

    #[test]
    fn test_validate_timestamp_within_skew_tolerance() {
        let near_future = Utc::now().timestamp_millis() + 60 * 1000;
        assert!(validate_timestamp(near_future).is_ok());
    }
}
