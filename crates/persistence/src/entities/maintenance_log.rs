//! Maintenance log entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Database row mapping for the maintenance_logs table.
#[derive(Debug, Clone, FromRow)]
pub struct MaintenanceLogEntity {
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
    pub parts_replaced: Option<serde_json::Value>,
    pub next_maintenance_date: Option<NaiveDate>,
    pub status: String,
}

impl From<MaintenanceLogEntity> for domain::models::MaintenanceLog {
    fn from(entity: MaintenanceLogEntity) -> Self {
        Self {
            id: entity.id,
            device_id: entity.device_id,
            performed_at: entity.performed_at,
            maintenance_type: entity.maintenance_type,
            description: entity.description,
            performed_by: entity.performed_by,
            efficiency_before: entity.efficiency_before,
            efficiency_after: entity.efficiency_after,
            power_before: entity.power_before,
            power_after: entity.power_after,
            cost: entity.cost,
            duration_hours: entity.duration_hours,
            parts_replaced: entity.parts_replaced,
            next_maintenance_date: entity.next_maintenance_date,
            status: entity.status,
        }
    }
}
