//! Maintenance log repository.

use domain::models::maintenance::CreateMaintenanceLogRequest;
use sqlx::{PgConnection, PgPool};

use crate::entities::MaintenanceLogEntity;

const MAINTENANCE_COLUMNS: &str = r#"
    id, device_id, performed_at, maintenance_type, description, performed_by,
    efficiency_before, efficiency_after, power_before, power_after,
    cost, duration_hours, parts_replaced, next_maintenance_date, status
"#;

/// Repository for maintenance log operations.
#[derive(Clone)]
pub struct MaintenanceLogRepository {
    pool: PgPool,
}

impl MaintenanceLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a maintenance event. Runs inside the caller's transaction so
    /// the log and the device updates it implies commit together.
    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        request: &CreateMaintenanceLogRequest,
    ) -> Result<MaintenanceLogEntity, sqlx::Error> {
        sqlx::query_as::<_, MaintenanceLogEntity>(&format!(
            r#"
            INSERT INTO maintenance_logs (
                device_id, maintenance_type, description, performed_by,
                efficiency_before, efficiency_after, power_before, power_after,
                cost, duration_hours, parts_replaced, next_maintenance_date, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {MAINTENANCE_COLUMNS}
            "#
        ))
        .bind(&request.device_id)
        .bind(&request.maintenance_type)
        .bind(&request.description)
        .bind(&request.performed_by)
        .bind(request.efficiency_before)
        .bind(request.efficiency_after)
        .bind(request.power_before)
        .bind(request.power_after)
        .bind(request.cost)
        .bind(request.duration_hours)
        .bind(&request.parts_replaced)
        .bind(request.next_maintenance_date)
        .bind(&request.status)
        .fetch_one(&mut *conn)
        .await
    }

    /// Maintenance history for a device, newest first.
    pub async fn list_for_device(
        &self,
        device_id: &str,
    ) -> Result<Vec<MaintenanceLogEntity>, sqlx::Error> {
        sqlx::query_as::<_, MaintenanceLogEntity>(&format!(
            r#"
            SELECT {MAINTENANCE_COLUMNS}
            FROM maintenance_logs
            WHERE device_id = $1
            ORDER BY performed_at DESC
            "#
        ))
        .bind(device_id)
        .fetch_all(&self.pool)
        .await
    }
}
