//! Device repository.

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::device::ProvisionDeviceRequest;
use sqlx::{PgConnection, PgPool};

use crate::entities::DeviceEntity;

const DEVICE_COLUMNS: &str = r#"
    id, name, device_type, status, location_lat, location_lon, location_name,
    power_output_kw, efficiency_percent, temperature_celsius, voltage, current,
    rated_capacity_kw, panel_area_m2, installation_date,
    uptime_percent, total_energy_generated_kwh, last_maintenance_date,
    last_reading_at, created_at, updated_at
"#;

/// Fields applied to the device's live snapshot by an accepted reading.
/// Missing measurements keep the previous snapshot value.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotUpdate {
    pub power_output_kw: Option<f64>,
    pub efficiency_percent: Option<f64>,
    pub temperature_celsius: Option<f64>,
    pub voltage: Option<f64>,
    pub current: Option<f64>,
    pub energy_delta_kwh: f64,
    pub captured_at: DateTime<Utc>,
}

/// Repository for device operations.
#[derive(Clone)]
pub struct DeviceRepository {
    pool: PgPool,
}

impl DeviceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all devices, stable order for status/report output.
    pub async fn list(&self) -> Result<Vec<DeviceEntity>, sqlx::Error> {
        sqlx::query_as::<_, DeviceEntity>(&format!(
            "SELECT {DEVICE_COLUMNS} FROM devices ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
    }

    /// Get a device by ID.
    pub async fn get(&self, id: &str) -> Result<Option<DeviceEntity>, sqlx::Error> {
        sqlx::query_as::<_, DeviceEntity>(&format!(
            "SELECT {DEVICE_COLUMNS} FROM devices WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Insert a new device. Fails with a unique violation if the ID exists.
    pub async fn insert(
        &self,
        request: &ProvisionDeviceRequest,
    ) -> Result<DeviceEntity, sqlx::Error> {
        sqlx::query_as::<_, DeviceEntity>(&format!(
            r#"
            INSERT INTO devices (
                id, name, device_type,
                location_lat, location_lon, location_name,
                rated_capacity_kw, panel_area_m2, installation_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {DEVICE_COLUMNS}
            "#
        ))
        .bind(&request.id)
        .bind(&request.name)
        .bind(&request.device_type)
        .bind(request.location_lat)
        .bind(request.location_lon)
        .bind(&request.location_name)
        .bind(request.rated_capacity_kw)
        .bind(request.panel_area_m2)
        .bind(request.installation_date)
        .fetch_one(&self.pool)
        .await
    }

    /// Insert a bare device row for auto-provisioning: identity from the
    /// reading payload, everything else defaulted. The upsert form always
    /// returns and locks the row, so a concurrent provision race collapses
    /// into the normal serialized path.
    pub async fn insert_auto_provisioned(
        &self,
        conn: &mut PgConnection,
        id: &str,
    ) -> Result<DeviceEntity, sqlx::Error> {
        sqlx::query_as::<_, DeviceEntity>(&format!(
            r#"
            INSERT INTO devices (id, name)
            VALUES ($1, $1)
            ON CONFLICT (id) DO UPDATE SET updated_at = NOW()
            RETURNING {DEVICE_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_one(&mut *conn)
        .await
    }

    /// Lock the device row for the duration of an ingestion transaction.
    /// Serializes concurrent submissions for the same device.
    pub async fn lock_for_ingest(
        &self,
        conn: &mut PgConnection,
        id: &str,
    ) -> Result<Option<DeviceEntity>, sqlx::Error> {
        sqlx::query_as::<_, DeviceEntity>(&format!(
            "SELECT {DEVICE_COLUMNS} FROM devices WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
    }

    /// Apply an accepted reading to the device's live snapshot inside the
    /// ingestion transaction. Sets the device online and advances the
    /// lifetime energy counter.
    pub async fn apply_snapshot(
        &self,
        conn: &mut PgConnection,
        id: &str,
        update: &SnapshotUpdate,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE devices
            SET power_output_kw = COALESCE($2, power_output_kw),
                efficiency_percent = COALESCE($3, efficiency_percent),
                temperature_celsius = COALESCE($4, temperature_celsius),
                voltage = COALESCE($5, voltage),
                current = COALESCE($6, current),
                total_energy_generated_kwh = total_energy_generated_kwh + $7,
                status = 'online',
                last_reading_at = $8,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(update.power_output_kw)
        .bind(update.efficiency_percent)
        .bind(update.temperature_celsius)
        .bind(update.voltage)
        .bind(update.current)
        .bind(update.energy_delta_kwh)
        .bind(update.captured_at)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Set a device's operating status inside the caller's transaction.
    pub async fn set_status(
        &self,
        conn: &mut PgConnection,
        id: &str,
        status: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE devices SET status = $2, updated_at = NOW() WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record the most recent maintenance date on the device inside the
    /// caller's transaction.
    pub async fn set_last_maintenance(
        &self,
        conn: &mut PgConnection,
        id: &str,
        date: NaiveDate,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE devices SET last_maintenance_date = $2, updated_at = NOW() WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(date)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Mark online devices without a reading since the cutoff as offline.
    /// Devices under maintenance are left alone. Returns the affected IDs.
    pub async fn mark_stale_offline(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            UPDATE devices
            SET status = 'offline', updated_at = NOW()
            WHERE status = 'online'
              AND (last_reading_at IS NULL OR last_reading_at < $1)
            RETURNING id
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Update a device's lifetime uptime percentage.
    pub async fn set_uptime_percent(&self, id: &str, uptime: f64) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE devices SET uptime_percent = $2, updated_at = NOW() WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(uptime)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
