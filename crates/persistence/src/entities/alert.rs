//! Alert entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{AlertSeverity, AlertStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the alerts table.
#[derive(Debug, Clone, FromRow)]
pub struct AlertEntity {
    pub id: Uuid,
    pub device_id: Option<String>,
    pub metric: String,
    pub severity: String,
    pub value: f64,
    pub threshold: f64,
    pub message: String,
    pub status: String,
    pub acknowledged_by: Option<String>,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub context: Option<serde_json::Value>,
    pub raised_at: DateTime<Utc>,
    pub last_observed_at: DateTime<Utc>,
}

impl From<AlertEntity> for domain::models::Alert {
    fn from(entity: AlertEntity) -> Self {
        Self {
            severity: AlertSeverity::parse(&entity.severity).unwrap_or(AlertSeverity::Info),
            status: AlertStatus::parse(&entity.status).unwrap_or(AlertStatus::Active),
            id: entity.id,
            device_id: entity.device_id,
            metric: entity.metric,
            value: entity.value,
            threshold: entity.threshold,
            message: entity.message,
            acknowledged_by: entity.acknowledged_by,
            acknowledged_at: entity.acknowledged_at,
            resolved_at: entity.resolved_at,
            context: entity.context,
            raised_at: entity.raised_at,
            last_observed_at: entity.last_observed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_entity_to_domain() {
        let entity = AlertEntity {
            id: Uuid::new_v4(),
            device_id: Some("PV-001".to_string()),
            metric: "Temperature".to_string(),
            severity: "CRITICAL".to_string(),
            value: 81.2,
            threshold: 75.0,
            message: "too hot".to_string(),
            status: "active".to_string(),
            acknowledged_by: None,
            acknowledged_at: None,
            resolved_at: None,
            context: None,
            raised_at: Utc::now(),
            last_observed_at: Utc::now(),
        };
        let alert: domain::models::Alert = entity.clone().into();
        assert_eq!(alert.severity, AlertSeverity::Critical);
        assert_eq!(alert.status, AlertStatus::Active);
        assert_eq!(alert.device_id.as_deref(), Some("PV-001"));
    }
}
