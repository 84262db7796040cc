//! Daily statistics entity (database row mapping).

use chrono::NaiveDate;
use sqlx::FromRow;

/// Database row mapping for the daily_statistics table. One row per
/// (device_id, stat_date), enforced by a unique constraint.
#[derive(Debug, Clone, FromRow)]
pub struct DailyStatisticEntity {
    pub id: i64,
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

impl From<DailyStatisticEntity> for domain::models::DailyStatistic {
    fn from(entity: DailyStatisticEntity) -> Self {
        Self {
            device_id: entity.device_id,
            stat_date: entity.stat_date,
            total_energy_kwh: entity.total_energy_kwh,
            peak_power_kw: entity.peak_power_kw,
            average_power_kw: entity.average_power_kw,
            average_efficiency: entity.average_efficiency,
            performance_ratio: entity.performance_ratio,
            capacity_factor: entity.capacity_factor,
            average_irradiance: entity.average_irradiance,
            peak_irradiance: entity.peak_irradiance,
            average_temperature: entity.average_temperature,
            energy_savings: entity.energy_savings,
            co2_offset_kg: entity.co2_offset_kg,
            uptime_hours: entity.uptime_hours,
            downtime_hours: entity.downtime_hours,
            alert_count: entity.alert_count,
        }
    }
}
