//! Daily aggregate statistics domain model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row per (device, calendar date), aggregating that day's readings.
/// Recomputed and upserted as new readings arrive; at most one row per key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStatistic {
    pub device_id: String,
    pub stat_date: NaiveDate,

    // Energy metrics
    pub total_energy_kwh: f64,
    pub peak_power_kw: Option<f64>,
    pub average_power_kw: Option<f64>,

    // Performance metrics
    pub average_efficiency: Option<f64>,
    pub performance_ratio: Option<f64>,
    pub capacity_factor: Option<f64>,

    // Environmental conditions
    pub average_irradiance: Option<f64>,
    pub peak_irradiance: Option<f64>,
    pub average_temperature: Option<f64>,

    // Financial metrics
    pub energy_savings: f64,
    pub co2_offset_kg: f64,

    // Operational metrics
    pub uptime_hours: f64,
    pub downtime_hours: f64,
    pub alert_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_statistic_serialization() {
        let stat = DailyStatistic {
            device_id: "PV-001".to_string(),
            stat_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            total_energy_kwh: 21.4,
            peak_power_kw: Some(4.1),
            average_power_kw: Some(2.2),
            average_efficiency: Some(17.8),
            performance_ratio: Some(0.83),
            capacity_factor: Some(0.18),
            average_irradiance: Some(540.0),
            peak_irradiance: Some(980.0),
            average_temperature: Some(31.5),
            energy_savings: 160.5,
            co2_offset_kg: 17.5,
            uptime_hours: 11.5,
            downtime_hours: 12.5,
            alert_count: 2,
        };
        let json = serde_json::to_string(&stat).unwrap();
        assert!(json.contains("\"statDate\":\"2025-06-01\""));
        assert!(json.contains("\"totalEnergyKwh\":21.4"));
    }
}
