//! Aggregated report domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::daily_statistic::DailyStatistic;
use crate::models::status::SeverityCounts;

/// Aggregate figures over a report window, per device or system-wide.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTotals {
    pub total_energy_kwh: f64,
    pub average_power_kw: f64,
    pub peak_power_kw: f64,
    pub average_efficiency: Option<f64>,
    pub average_performance_ratio: Option<f64>,
    pub energy_savings: f64,
    pub co2_offset_kg: f64,
    pub uptime_hours: f64,
    pub downtime_hours: f64,
    pub alerts: SeverityCounts,
}

/// Per-device section of a report: totals plus one row per calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceReport {
    pub device_id: String,
    pub device_name: String,
    pub totals: ReportTotals,
    pub daily: Vec<DailyStatistic>,
}

/// Multi-day operational/financial report as returned by `GET /report`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub days: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub totals: ReportTotals,
    pub devices: Vec<DeviceReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serialization() {
        let report = Report {
            generated_at: Utc::now(),
            days: 7,
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 7).unwrap(),
            totals: ReportTotals {
                total_energy_kwh: 150.0,
                average_power_kw: 1.2,
                peak_power_kw: 4.5,
                average_efficiency: Some(18.2),
                average_performance_ratio: Some(0.81),
                energy_savings: 1125.0,
                co2_offset_kg: 123.0,
                uptime_hours: 80.0,
                downtime_hours: 88.0,
                alerts: SeverityCounts::default(),
            },
            devices: vec![],
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"days\":7"));
        assert!(json.contains("\"totalEnergyKwh\":150"));
        assert!(json.contains("\"startDate\":\"2025-06-01\""));
    }
}
