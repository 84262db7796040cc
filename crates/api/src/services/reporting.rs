//! Status and report aggregation.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDate, Utc};

use domain::models::alert::AlertSeverity;
use domain::models::report::{DeviceReport, Report, ReportTotals};
use domain::models::status::{DeviceStatusItem, SeverityCounts, StatusSummary, SystemStatus};
use domain::models::{DailyStatistic, DeviceStatus};
use persistence::entities::DeviceEntity;
use persistence::repositories::{
    AlertRepository, DailyStatisticRepository, DeviceRepository, ReadingRepository,
    SeverityCountRow,
};

use crate::app::AppState;
use crate::services::{rollup, ServiceError};

/// Maximum report window; longer requests are clamped. A window below one
/// day is a validation error.
pub const MAX_REPORT_DAYS: u32 = 90;
pub const DEFAULT_REPORT_DAYS: u32 = 7;

/// Assemble the live system status: one entry per device plus the
/// system-wide rollup.
pub async fn get_system_status(state: &AppState) -> Result<SystemStatus, ServiceError> {
    let devices = DeviceRepository::new(state.pool.clone()).list().await?;
    let alert_rows = AlertRepository::new(state.pool.clone())
        .active_counts_by_device()
        .await?;

    let per_device = severity_counts_by_device(&alert_rows);

    let mut summary = StatusSummary {
        total_devices: devices.len() as i64,
        online: 0,
        offline: 0,
        maintenance: 0,
        total_power_kw: 0.0,
        active_alerts: SeverityCounts::default(),
    };

    let mut items = Vec::with_capacity(devices.len());
    for entity in devices {
        let device: domain::models::Device = entity.into();
        match device.status {
            DeviceStatus::Online => summary.online += 1,
            DeviceStatus::Offline => summary.offline += 1,
            DeviceStatus::Maintenance => summary.maintenance += 1,
        }
        // Offline panels are not producing; their stale snapshot power does
        // not count toward the fleet total.
        if device.status == DeviceStatus::Online {
            summary.total_power_kw += device.power_output_kw;
        }

        let counts = per_device
            .get(device.id.as_str())
            .copied()
            .unwrap_or_default();
        summary.active_alerts.info += counts.info;
        summary.active_alerts.warn += counts.warn;
        summary.active_alerts.critical += counts.critical;

        items.push(DeviceStatusItem {
            id: device.id,
            name: device.name,
            status: device.status,
            power_output_kw: device.power_output_kw,
            efficiency_percent: device.efficiency_percent,
            temperature_celsius: device.temperature_celsius,
            voltage: device.voltage,
            current: device.current,
            total_energy_generated_kwh: device.total_energy_generated_kwh,
            uptime_percent: device.uptime_percent,
            last_reading_at: device.last_reading_at,
            active_alerts: counts.total(),
        });
    }

    Ok(SystemStatus {
        generated_at: Utc::now(),
        summary,
        devices: items,
    })
}

/// Generate a multi-day report ending today (UTC). Every day in the window
/// with readings but no daily_statistics row is computed on demand, so the
/// report never drops a day the scheduled rollup missed.
pub async fn generate_report(state: &AppState, days: u32) -> Result<Report, ServiceError> {
    if days < 1 {
        return Err(ServiceError::Validation(
            "Report window must be at least 1 day".to_string(),
        ));
    }
    let days = days.min(MAX_REPORT_DAYS);
    let end_date = Utc::now().date_naive();
    let start_date = end_date - Duration::days(days as i64 - 1);

    let devices = DeviceRepository::new(state.pool.clone()).list().await?;
    backfill_window(state, &devices, start_date, end_date).await?;

    let stat_rows = DailyStatisticRepository::new(state.pool.clone())
        .list_between(start_date, end_date)
        .await?;
    let alert_rows = AlertRepository::new(state.pool.clone())
        .counts_raised_between(start_date, end_date)
        .await?;
    let alert_counts = severity_counts_by_device(&alert_rows);

    let mut daily_by_device: HashMap<String, Vec<DailyStatistic>> = HashMap::new();
    for row in stat_rows {
        let stat: DailyStatistic = row.into();
        daily_by_device
            .entry(stat.device_id.clone())
            .or_default()
            .push(stat);
    }

    let mut report_totals = ReportTotals::default();
    let mut efficiency_sum = 0.0;
    let mut efficiency_n = 0u32;
    let mut ratio_sum = 0.0;
    let mut ratio_n = 0u32;

    let mut device_reports = Vec::with_capacity(devices.len());
    for entity in devices {
        let daily = daily_by_device.remove(&entity.id).unwrap_or_default();
        let alerts = alert_counts.get(entity.id.as_str()).copied().unwrap_or_default();
        let totals = device_totals(&daily, alerts);

        report_totals.total_energy_kwh += totals.total_energy_kwh;
        report_totals.peak_power_kw = report_totals.peak_power_kw.max(totals.peak_power_kw);
        report_totals.energy_savings += totals.energy_savings;
        report_totals.co2_offset_kg += totals.co2_offset_kg;
        report_totals.uptime_hours += totals.uptime_hours;
        report_totals.downtime_hours += totals.downtime_hours;
        report_totals.alerts.info += totals.alerts.info;
        report_totals.alerts.warn += totals.alerts.warn;
        report_totals.alerts.critical += totals.alerts.critical;
        if let Some(eff) = totals.average_efficiency {
            efficiency_sum += eff;
            efficiency_n += 1;
        }
        if let Some(ratio) = totals.average_performance_ratio {
            ratio_sum += ratio;
            ratio_n += 1;
        }

        device_reports.push(DeviceReport {
            device_id: entity.id,
            device_name: entity.name,
            totals,
            daily,
        });
    }

    let total_hours = report_totals.uptime_hours + report_totals.downtime_hours;
    report_totals.average_power_kw = if total_hours > 0.0 {
        report_totals.total_energy_kwh / total_hours
    } else {
        0.0
    };
    report_totals.average_efficiency =
        (efficiency_n > 0).then(|| efficiency_sum / efficiency_n as f64);
    report_totals.average_performance_ratio = (ratio_n > 0).then(|| ratio_sum / ratio_n as f64);

    Ok(Report {
        generated_at: Utc::now(),
        days,
        start_date,
        end_date,
        totals: report_totals,
        devices: device_reports,
    })
}

/// Fill the daily_statistics gaps inside a report window. Past days are
/// computed only when no row exists (readings ingested after the last rollup
/// tick before a shutdown, or submitted with historical timestamps); the
/// current day is always recomputed so it reflects the latest readings.
async fn backfill_window(
    state: &AppState,
    devices: &[DeviceEntity],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<(), ServiceError> {
    let readings = ReadingRepository::new(state.pool.clone());
    let existing: HashSet<(String, NaiveDate)> = DailyStatisticRepository::new(state.pool.clone())
        .list_between(start_date, end_date)
        .await?
        .into_iter()
        .map(|row| (row.device_id, row.stat_date))
        .collect();
    let by_id: HashMap<&str, &DeviceEntity> =
        devices.iter().map(|d| (d.id.as_str(), d)).collect();

    let mut day = start_date;
    while day <= end_date {
        for device_id in readings.device_ids_with_readings_on(day).await? {
            if day == end_date || !existing.contains(&(device_id.clone(), day)) {
                if let Some(device) = by_id.get(device_id.as_str()) {
                    rollup::compute_and_store_day(state, device, day).await?;
                }
            }
        }
        day += Duration::days(1);
    }
    Ok(())
}

fn device_totals(daily: &[DailyStatistic], alerts: SeverityCounts) -> ReportTotals {
    let mut totals = ReportTotals {
        alerts,
        ..Default::default()
    };

    let mut efficiency_sum = 0.0;
    let mut efficiency_n = 0u32;
    let mut ratio_sum = 0.0;
    let mut ratio_n = 0u32;

    for stat in daily {
        totals.total_energy_kwh += stat.total_energy_kwh;
        if let Some(peak) = stat.peak_power_kw {
            totals.peak_power_kw = totals.peak_power_kw.max(peak);
        }
        totals.energy_savings += stat.energy_savings;
        totals.co2_offset_kg += stat.co2_offset_kg;
        totals.uptime_hours += stat.uptime_hours;
        totals.downtime_hours += stat.downtime_hours;
        if let Some(eff) = stat.average_efficiency {
            efficiency_sum += eff;
            efficiency_n += 1;
        }
        if let Some(ratio) = stat.performance_ratio {
            ratio_sum += ratio;
            ratio_n += 1;
        }
    }

    totals.average_power_kw = if totals.uptime_hours > 0.0 {
        totals.total_energy_kwh / totals.uptime_hours
    } else {
        0.0
    };
    totals.average_efficiency = (efficiency_n > 0).then(|| efficiency_sum / efficiency_n as f64);
    totals.average_performance_ratio = (ratio_n > 0).then(|| ratio_sum / ratio_n as f64);

    totals
}

fn severity_counts_by_device(rows: &[SeverityCountRow]) -> HashMap<String, SeverityCounts> {
    let mut map: HashMap<String, SeverityCounts> = HashMap::new();
    for row in rows {
        let Some(device_id) = &row.device_id else {
            continue;
        };
        let counts = map.entry(device_id.clone()).or_default();
        match AlertSeverity::parse(&row.severity) {
            Some(AlertSeverity::Info) => counts.info += row.count,
            Some(AlertSeverity::Warn) => counts.warn += row.count,
            Some(AlertSeverity::Critical) => counts.critical += row.count,
            None => {}
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stat(date: NaiveDate, energy: f64, uptime: f64) -> DailyStatistic {
        DailyStatistic {
            device_id: "PV-001".to_string(),
            stat_date: date,
            total_energy_kwh: energy,
            peak_power_kw: Some(4.0),
            average_power_kw: Some(2.0),
            average_efficiency: Some(18.0),
            performance_ratio: Some(0.8),
            capacity_factor: Some(0.2),
            average_irradiance: Some(500.0),
            peak_irradiance: Some(950.0),
            average_temperature: Some(30.0),
            energy_savings: energy * 7.5,
            co2_offset_kg: energy * 0.82,
            uptime_hours: uptime,
            downtime_hours: 24.0 - uptime,
            alert_count: 0,
        }
    }

    #[test]
    fn test_device_totals_sums_and_averages() {
        let day1 = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let day2 = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let daily = vec![stat(day1, 20.0, 10.0), stat(day2, 10.0, 5.0)];

        let totals = device_totals(&daily, SeverityCounts::default());
        assert!((totals.total_energy_kwh - 30.0).abs() < 1e-9);
        assert!((totals.energy_savings - 225.0).abs() < 1e-9);
        assert!((totals.co2_offset_kg - 24.6).abs() < 1e-9);
        assert_eq!(totals.peak_power_kw, 4.0);
        assert!((totals.uptime_hours - 15.0).abs() < 1e-9);
        // 30 kWh over 15 uptime hours
        assert!((totals.average_power_kw - 2.0).abs() < 1e-9);
        assert_eq!(totals.average_efficiency, Some(18.0));
    }

    #[test]
    fn test_device_totals_empty_window() {
        let totals = device_totals(&[], SeverityCounts::default());
        assert_eq!(totals.total_energy_kwh, 0.0);
        assert_eq!(totals.average_power_kw, 0.0);
        assert!(totals.average_efficiency.is_none());
    }

    #[test]
    fn test_severity_counts_by_device() {
        let rows = vec![
            SeverityCountRow {
                device_id: Some("PV-001".to_string()),
                severity: "WARN".to_string(),
                count: 2,
            },
            SeverityCountRow {
                device_id: Some("PV-001".to_string()),
                severity: "CRITICAL".to_string(),
                count: 1,
            },
            SeverityCountRow {
                device_id: None,
                severity: "INFO".to_string(),
                count: 5,
            },
        ];
        let map = severity_counts_by_device(&rows);
        let counts = map.get("PV-001").unwrap();
        assert_eq!(counts.warn, 2);
        assert_eq!(counts.critical, 1);
        assert_eq!(counts.total(), 3);
        assert_eq!(map.len(), 1);
    }
}
