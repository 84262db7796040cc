//! System status domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::device::DeviceStatus;

/// Per-device entry in the system status: the live snapshot plus the count
/// of currently active alerts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatusItem {
    pub id: String,
    pub name: String,
    pub status: DeviceStatus,
    pub power_output_kw: f64,
    pub efficiency_percent: f64,
    pub temperature_celsius: f64,
    pub voltage: f64,
    pub current: f64,
    pub total_energy_generated_kwh: f64,
    pub uptime_percent: f64,
    pub last_reading_at: Option<DateTime<Utc>>,
    pub active_alerts: i64,
}

/// Active alert counts broken down by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityCounts {
    pub info: i64,
    pub warn: i64,
    pub critical: i64,
}

impl SeverityCounts {
    pub fn total(&self) -> i64 {
        self.info + self.warn + self.critical
    }
}

/// System-wide rollup across all devices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub total_devices: i64,
    pub online: i64,
    pub offline: i64,
    pub maintenance: i64,
    pub total_power_kw: f64,
    pub active_alerts: SeverityCounts,
}

/// Full system status as returned by `GET /status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub generated_at: DateTime<Utc>,
    pub summary: StatusSummary,
    pub devices: Vec<DeviceStatusItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_counts_total() {
        let counts = SeverityCounts {
            info: 1,
            warn: 2,
            critical: 3,
        };
        assert_eq!(counts.total(), 6);
        assert_eq!(SeverityCounts::default().total(), 0);
    }

    #[test]
    fn test_system_status_serialization() {
        let status = SystemStatus {
            generated_at: Utc::now(),
            summary: StatusSummary {
                total_devices: 2,
                online: 1,
                offline: 1,
                maintenance: 0,
                total_power_kw: 3.4,
                active_alerts: SeverityCounts::default(),
            },
            devices: vec![],
        };
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("\"totalDevices\":2"));
        assert!(json.contains("\"totalPowerKw\":3.4"));
    }
}
