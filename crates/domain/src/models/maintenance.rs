//! Maintenance log domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Immutable record of a maintenance event on a device. Created by operator
/// action, never by the ingestion pipeline; read by the aggregator for
/// downtime and schedule adherence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceLog {
    pub id: i64,
    pub device_id: String,
    pub performed_at: DateTime<Utc>,
    pub maintenance_type: String,
    pub description: Option<String>,
    pub performed_by: Option<String>,
    pub efficiency_before: Option<f64>,
    pub efficiency_after: Option<f64>,
    pub power_before: Option<f64>,
    pub power_after: Option<f64>,
    pub cost: Option<f64>,
    pub duration_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts_replaced: Option<serde_json::Value>,
    pub next_maintenance_date: Option<NaiveDate>,
    pub status: String,
}

/// Request payload for recording a maintenance event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaintenanceLogRequest {
    #[validate(length(min = 1, max = 64, message = "Device id must be 1-64 characters"))]
    pub device_id: String,

    /// One of: scheduled, corrective, predictive.
    #[validate(length(min = 1, max = 32, message = "Maintenance type is required"))]
    pub maintenance_type: String,

    pub description: Option<String>,
    pub performed_by: Option<String>,
    pub efficiency_before: Option<f64>,
    pub efficiency_after: Option<f64>,
    pub power_before: Option<f64>,
    pub power_after: Option<f64>,
    pub cost: Option<f64>,
    pub duration_hours: Option<f64>,
    pub parts_replaced: Option<serde_json::Value>,
    pub next_maintenance_date: Option<NaiveDate>,

    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "completed".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_create_request_minimal() {
        let json = r#"{"deviceId": "PV-001", "maintenanceType": "scheduled"}"#;
        let request: CreateMaintenanceLogRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.status, "completed");
    }

    #[test]
    fn test_create_request_rejects_empty_type() {
        let json = r#"{"deviceId": "PV-001", "maintenanceType": ""}"#;
        let request: CreateMaintenanceLogRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());
    }
}
