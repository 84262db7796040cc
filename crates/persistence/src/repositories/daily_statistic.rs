//! Daily statistics repository.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::entities::DailyStatisticEntity;

const STAT_COLUMNS: &str = r#"
    id, device_id, stat_date, total_energy_kwh, peak_power_kw, average_power_kw,
    average_efficiency, performance_ratio, capacity_factor,
    average_irradiance, peak_irradiance, average_temperature,
    energy_savings, co2_offset_kg, uptime_hours, downtime_hours, alert_count
"#;

/// Parameters for upserting one device-day row. The (device_id, stat_date)
/// pair is the upsert key.
#[derive(Debug, Clone)]
pub struct DailyStatisticUpsert {
    pub device_id: String,
    pub stat_date: NaiveDate,
    pub total_energy_kwh: f64,
    pub peak_power_kw: Option<f64>,
    pub average_power_kw: Option<f64>,
    pub average_efficiency: Option<f64>,
    pub performance_ratio: Option<f64>,
    pub capacity_factor: Option<f64>,
    pub average_irradiance: Option<f64>,
    pub peak_irradiance: Option<f64>,
    pub average_temperature: Option<f64>,
    pub energy_savings: f64,
    pub co2_offset_kg: f64,
    pub uptime_hours: f64,
    pub downtime_hours: f64,
    pub alert_count: i64,
}

/// Repository for daily aggregate statistics.
#[derive(Clone)]
pub struct DailyStatisticRepository {
    pool: PgPool,
}

impl DailyStatisticRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upsert a device-day row. Recomputation overwrites the previous values;
    /// the unique constraint keeps at most one row per key.
    pub async fn upsert(
        &self,
        stat: &DailyStatisticUpsert,
    ) -> Result<DailyStatisticEntity, sqlx::Error> {
        sqlx::query_as::<_, DailyStatisticEntity>(&format!(
            r#"
            INSERT INTO daily_statistics (
                device_id, stat_date, total_energy_kwh, peak_power_kw, average_power_kw,
                average_efficiency, performance_ratio, capacity_factor,
                average_irradiance, peak_irradiance, average_temperature,
                energy_savings, co2_offset_kg, uptime_hours, downtime_hours, alert_count
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT (device_id, stat_date) DO UPDATE SET
                total_energy_kwh = EXCLUDED.total_energy_kwh,
                peak_power_kw = EXCLUDED.peak_power_kw,
                average_power_kw = EXCLUDED.average_power_kw,
                average_efficiency = EXCLUDED.average_efficiency,
                performance_ratio = EXCLUDED.performance_ratio,
                capacity_factor = EXCLUDED.capacity_factor,
                average_irradiance = EXCLUDED.average_irradiance,
                peak_irradiance = EXCLUDED.peak_irradiance,
                average_temperature = EXCLUDED.average_temperature,
                energy_savings = EXCLUDED.energy_savings,
                co2_offset_kg = EXCLUDED.co2_offset_kg,
                uptime_hours = EXCLUDED.uptime_hours,
                downtime_hours = EXCLUDED.downtime_hours,
                alert_count = EXCLUDED.alert_count
            RETURNING {STAT_COLUMNS}
            "#
        ))
        .bind(&stat.device_id)
        .bind(stat.stat_date)
        .bind(stat.total_energy_kwh)
        .bind(stat.peak_power_kw)
        .bind(stat.average_power_kw)
        .bind(stat.average_efficiency)
        .bind(stat.performance_ratio)
        .bind(stat.capacity_factor)
        .bind(stat.average_irradiance)
        .bind(stat.peak_irradiance)
        .bind(stat.average_temperature)
        .bind(stat.energy_savings)
        .bind(stat.co2_offset_kg)
        .bind(stat.uptime_hours)
        .bind(stat.downtime_hours)
        .bind(stat.alert_count)
        .fetch_one(&self.pool)
        .await
    }

    /// All device-day rows inside a date window, ordered for report output.
    pub async fn list_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyStatisticEntity>, sqlx::Error> {
        sqlx::query_as::<_, DailyStatisticEntity>(&format!(
            r#"
            SELECT {STAT_COLUMNS}
            FROM daily_statistics
            WHERE stat_date BETWEEN $1 AND $2
            ORDER BY device_id, stat_date
            "#
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
    }
}
