//! Sensor reading repository.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgConnection, PgPool};

use crate::entities::{DayAggregatesEntity, ReadingEntity};

const READING_COLUMNS: &str = r#"
    id, device_id, captured_at,
    solar_irradiance, ambient_temperature, panel_temperature, humidity, wind_speed,
    power_output_kw, voltage, current, frequency,
    efficiency_percent, performance_ratio, data_quality_score
"#;

/// A fully normalized reading ready for insertion: raw measurements plus
/// derived metrics, with the timestamp already resolved by the pipeline.
#[derive(Debug, Clone)]
pub struct NewReading {
    pub device_id: String,
    pub captured_at: DateTime<Utc>,
    pub solar_irradiance: Option<f64>,
    pub ambient_temperature: Option<f64>,
    pub panel_temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub power_output_kw: Option<f64>,
    pub voltage: Option<f64>,
    pub current: Option<f64>,
    pub frequency: Option<f64>,
    pub efficiency_percent: Option<f64>,
    pub performance_ratio: Option<f64>,
    pub data_quality_score: f64,
}

/// Repository for sensor reading operations.
#[derive(Clone)]
pub struct ReadingRepository {
    pool: PgPool,
}

impl ReadingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a reading inside the ingestion transaction.
    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        reading: &NewReading,
    ) -> Result<i64, sqlx::Error> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO sensor_readings (
                device_id, captured_at,
                solar_irradiance, ambient_temperature, panel_temperature, humidity, wind_speed,
                power_output_kw, voltage, current, frequency,
                efficiency_percent, performance_ratio, data_quality_score
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id
            "#,
        )
        .bind(&reading.device_id)
        .bind(reading.captured_at)
        .bind(reading.solar_irradiance)
        .bind(reading.ambient_temperature)
        .bind(reading.panel_temperature)
        .bind(reading.humidity)
        .bind(reading.wind_speed)
        .bind(reading.power_output_kw)
        .bind(reading.voltage)
        .bind(reading.current)
        .bind(reading.frequency)
        .bind(reading.efficiency_percent)
        .bind(reading.performance_ratio)
        .bind(reading.data_quality_score)
        .fetch_one(&mut *conn)
        .await?;
        Ok(id)
    }

    /// Most recent irradiance values for a device, newest first, for the
    /// consecutive-duration condition of the low-irradiance rule. Must run
    /// inside the ingestion transaction, before the current reading is
    /// inserted.
    pub async fn recent_irradiance(
        &self,
        conn: &mut PgConnection,
        device_id: &str,
        limit: i64,
    ) -> Result<Vec<f64>, sqlx::Error> {
        let rows: Vec<(f64,)> = sqlx::query_as(
            r#"
            SELECT solar_irradiance
            FROM sensor_readings
            WHERE device_id = $1 AND solar_irradiance IS NOT NULL
            ORDER BY captured_at DESC
            LIMIT $2
            "#,
        )
        .bind(device_id)
        .bind(limit)
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows.into_iter().map(|(g,)| g).collect())
    }

    /// Latest readings for a device, newest first.
    pub async fn list_recent(
        &self,
        device_id: &str,
        limit: i64,
    ) -> Result<Vec<ReadingEntity>, sqlx::Error> {
        sqlx::query_as::<_, ReadingEntity>(&format!(
            r#"
            SELECT {READING_COLUMNS}
            FROM sensor_readings
            WHERE device_id = $1
            ORDER BY captured_at DESC
            LIMIT $2
            "#
        ))
        .bind(device_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Aggregates over one device's readings for a calendar day (UTC).
    ///
    /// Energy is integrated as the trapezoid of consecutive power samples,
    /// with sample gaps clamped to `max_gap_secs` so an outage does not
    /// credit the panel with hours of phantom generation.
    pub async fn day_aggregates(
        &self,
        device_id: &str,
        day: NaiveDate,
        max_gap_secs: i64,
    ) -> Result<DayAggregatesEntity, sqlx::Error> {
        sqlx::query_as::<_, DayAggregatesEntity>(
            r#"
            WITH day_readings AS (
                SELECT captured_at,
                       solar_irradiance,
                       panel_temperature,
                       power_output_kw,
                       efficiency_percent,
                       performance_ratio,
                       LAG(power_output_kw) OVER w AS prev_power,
                       LAG(captured_at) OVER w AS prev_captured_at
                FROM sensor_readings
                WHERE device_id = $1
                  AND captured_at >= $2::date
                  AND captured_at < $2::date + INTERVAL '1 day'
                WINDOW w AS (ORDER BY captured_at)
            )
            SELECT
                COUNT(*) AS sample_count,
                COALESCE(SUM(
                    CASE WHEN prev_power IS NOT NULL AND power_output_kw IS NOT NULL
                    THEN ((prev_power + power_output_kw) / 2.0)
                         * (LEAST(EXTRACT(EPOCH FROM captured_at - prev_captured_at), $3::double precision) / 3600.0)
                    END
                ), 0)::double precision AS total_energy_kwh,
                MAX(power_output_kw) AS peak_power_kw,
                AVG(power_output_kw) AS average_power_kw,
                AVG(efficiency_percent) AS average_efficiency,
                AVG(performance_ratio) AS average_performance_ratio,
                AVG(solar_irradiance) AS average_irradiance,
                MAX(solar_irradiance) AS peak_irradiance,
                AVG(panel_temperature) AS average_temperature,
                COALESCE(SUM(
                    LEAST(EXTRACT(EPOCH FROM captured_at - prev_captured_at), $3::double precision)
                ) FILTER (WHERE prev_captured_at IS NOT NULL), 0)::double precision AS covered_secs
            FROM day_readings
            "#,
        )
        .bind(device_id)
        .bind(day)
        .bind(max_gap_secs)
        .fetch_one(&self.pool)
        .await
    }

    /// Device IDs with at least one reading on the given day (UTC).
    pub async fn device_ids_with_readings_on(
        &self,
        day: NaiveDate,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT device_id
            FROM sensor_readings
            WHERE captured_at >= $1::date
              AND captured_at < $1::date + INTERVAL '1 day'
            "#,
        )
        .bind(day)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
