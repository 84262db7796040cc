//! Sensor reading domain model and ingestion payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::alert::AlertChange;

/// An immutable time-series fact: one timestamped set of measurements from a
/// device, plus derived performance metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub id: i64,
    pub device_id: String,
    pub captured_at: DateTime<Utc>,

    // Environmental measurements
    pub solar_irradiance: Option<f64>,
    pub ambient_temperature: Option<f64>,
    pub panel_temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,

    // Electrical measurements
    pub power_output_kw: Option<f64>,
    pub voltage: Option<f64>,
    pub current: Option<f64>,
    pub frequency: Option<f64>,

    // Derived performance metrics
    pub efficiency_percent: Option<f64>,
    pub performance_ratio: Option<f64>,
    pub data_quality_score: f64,
}

/// Raw reading payload as delivered by the hardware bridge or manual
/// submission. Missing fields are treated as unknown, not zero.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReadingRequest {
    #[validate(length(min = 1, max = 64, message = "Device id must be 1-64 characters"))]
    pub device_id: String,

    /// Device-supplied timestamp in milliseconds since epoch. Optional; the
    /// pipeline assigns the ingestion time when absent or out of order.
    #[validate(custom(function = "shared::validation::validate_timestamp"))]
    pub timestamp: Option<i64>,

    #[validate(custom(function = "shared::validation::validate_irradiance"))]
    pub solar_irradiance: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_temperature"))]
    pub ambient_temperature: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_temperature"))]
    pub panel_temperature: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_humidity"))]
    pub humidity: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_wind_speed"))]
    pub wind_speed: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_power"))]
    pub power_output_kw: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_voltage"))]
    pub voltage: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_current"))]
    pub current: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_frequency"))]
    pub frequency: Option<f64>,
}

impl SubmitReadingRequest {
    /// Number of recognized raw measurement fields, used for the
    /// data-quality score.
    pub const MEASUREMENT_FIELD_COUNT: usize = 9;

    /// Counts how many recognized measurement fields are present.
    pub fn present_field_count(&self) -> usize {
        [
            self.solar_irradiance.is_some(),
            self.ambient_temperature.is_some(),
            self.panel_temperature.is_some(),
            self.humidity.is_some(),
            self.wind_speed.is_some(),
            self.power_output_kw.is_some(),
            self.voltage.is_some(),
            self.current.is_some(),
            self.frequency.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

/// Response payload for reading submission: the persisted reading identity
/// and the alerts created, updated, or resolved by this call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReadingResponse {
    pub reading_id: i64,
    pub alerts: Vec<AlertChange>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_submit_reading_request_full() {
        let json = r#"{
            "deviceId": "PV-001",
            "solarIrradiance": 820.0,
            "ambientTemperature": 28.5,
            "panelTemperature": 41.0,
            "humidity": 45.0,
            "windSpeed": 3.2,
            "powerOutputKw": 3.8,
            "voltage": 231.5,
            "current": 16.4,
            "frequency": 50.0
        }"#;
        let request: SubmitReadingRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.present_field_count(), 9);
        assert!(request.timestamp.is_none());
    }

    #[test]
    fn test_submit_reading_request_partial_fields_unknown_not_zero() {
        let json = r#"{"deviceId": "PV-001", "powerOutputKw": 2.1}"#;
        let request: SubmitReadingRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.present_field_count(), 1);
        assert!(request.solar_irradiance.is_none());
    }

    #[test]
    fn test_submit_reading_request_rejects_out_of_range() {
        let json = r#"{"deviceId": "PV-001", "solarIrradiance": -10.0}"#;
        let request: SubmitReadingRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());

        let json = r#"{"deviceId": "PV-001", "humidity": 140.0}"#;
        let request: SubmitReadingRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_submit_reading_request_rejects_empty_device() {
        let json = r#"{"deviceId": ""}"#;
        let request: SubmitReadingRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_submit_reading_response_serialization() {
        let response = SubmitReadingResponse {
            reading_id: 42,
            alerts: vec![],
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"readingId\":42"));
        assert!(json.contains("\"alerts\":[]"));
    }
}
