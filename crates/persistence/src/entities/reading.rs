//! Sensor reading entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the sensor_readings table.
#[derive(Debug, Clone, FromRow)]
pub struct ReadingEntity {
    pub id: i64,
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

impl From<ReadingEntity> for domain::models::Reading {
    fn from(entity: ReadingEntity) -> Self {
        Self {
            id: entity.id,
            device_id: entity.device_id,
            captured_at: entity.captured_at,
            solar_irradiance: entity.solar_irradiance,
            ambient_temperature: entity.ambient_temperature,
            panel_temperature: entity.panel_temperature,
            humidity: entity.humidity,
            wind_speed: entity.wind_speed,
            power_output_kw: entity.power_output_kw,
            voltage: entity.voltage,
            current: entity.current,
            frequency: entity.frequency,
            efficiency_percent: entity.efficiency_percent,
            performance_ratio: entity.performance_ratio,
            data_quality_score: entity.data_quality_score,
        }
    }
}

/// Aggregates over one device's readings for a single calendar day, produced
/// by the rollup query. Averages are NULL when no reading carried the field.
#[derive(Debug, Clone, FromRow)]
pub struct DayAggregatesEntity {
    pub sample_count: i64,
    pub total_energy_kwh: f64,
    pub peak_power_kw: Option<f64>,
    pub average_power_kw: Option<f64>,
    pub average_efficiency: Option<f64>,
    pub average_performance_ratio: Option<f64>,
    pub average_irradiance: Option<f64>,
    pub peak_irradiance: Option<f64>,
    pub average_temperature: Option<f64>,
    /// Seconds of the day covered by consecutive samples, with gaps clamped
    /// the same way energy integration clamps them.
    pub covered_secs: f64,
}
