//! Device domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Operating status of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
    Maintenance,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Online => "online",
            DeviceStatus::Offline => "offline",
            DeviceStatus::Maintenance => "maintenance",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "online" => Some(DeviceStatus::Online),
            "offline" => Some(DeviceStatus::Offline),
            "maintenance" => Some(DeviceStatus::Maintenance),
            _ => None,
        }
    }
}

/// Canonical state of a physical device: identity, specs, live snapshot,
/// and lifetime counters. The snapshot fields are overwritten by the latest
/// accepted reading, never historized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub name: String,
    pub device_type: String,
    pub status: DeviceStatus,
    pub location_lat: Option<f64>,
    pub location_lon: Option<f64>,
    pub location_name: Option<String>,

    // Live snapshot (latest accepted reading)
    pub power_output_kw: f64,
    pub efficiency_percent: f64,
    pub temperature_celsius: f64,
    pub voltage: f64,
    pub current: f64,

    // Device specs
    pub rated_capacity_kw: Option<f64>,
    pub panel_area_m2: Option<f64>,
    pub installation_date: Option<NaiveDate>,

    // Lifetime counters
    pub uptime_percent: f64,
    pub total_energy_generated_kwh: f64,
    pub last_maintenance_date: Option<NaiveDate>,

    pub last_reading_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for device provisioning.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionDeviceRequest {
    #[validate(length(min = 1, max = 64, message = "Device id must be 1-64 characters"))]
    pub id: String,

    #[validate(length(min = 1, max = 128, message = "Name must be 1-128 characters"))]
    pub name: String,

    #[serde(default = "default_device_type")]
    pub device_type: String,

    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub location_lat: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub location_lon: Option<f64>,

    pub location_name: Option<String>,

    #[validate(custom(function = "shared::validation::validate_capacity"))]
    pub rated_capacity_kw: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_panel_area"))]
    pub panel_area_m2: Option<f64>,

    pub installation_date: Option<NaiveDate>,
}

fn default_device_type() -> String {
    "solar_panel".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_device_status_round_trip() {
        for status in [
            DeviceStatus::Online,
            DeviceStatus::Offline,
            DeviceStatus::Maintenance,
        ] {
            assert_eq!(DeviceStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(DeviceStatus::parse("broken"), None);
    }

    #[test]
    fn test_device_status_serde() {
        let json = serde_json::to_string(&DeviceStatus::Maintenance).unwrap();
        assert_eq!(json, "\"maintenance\"");
        let parsed: DeviceStatus = serde_json::from_str("\"online\"").unwrap();
        assert_eq!(parsed, DeviceStatus::Online);
    }

    #[test]
    fn test_provision_request_defaults() {
        let json = r#"{"id": "PV-001", "name": "Solar Array A1"}"#;
        let request: ProvisionDeviceRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.device_type, "solar_panel");
        assert!(request.rated_capacity_kw.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_provision_request_rejects_empty_id() {
        let json = r#"{"id": "", "name": "Solar Array A1"}"#;
        let request: ProvisionDeviceRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_provision_request_rejects_bad_capacity() {
        let json = r#"{"id": "PV-001", "name": "A1", "ratedCapacityKw": -5.0}"#;
        let request: ProvisionDeviceRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());
    }
}
