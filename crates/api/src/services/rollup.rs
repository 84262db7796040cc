//! Daily statistics rollup.
//!
//! Recomputes one (device, day) row from the raw readings and upserts it.
//! Both the scheduled rollup job and on-demand report generation use this,
//! so the two never disagree about a day's figures.

use chrono::NaiveDate;

use domain::models::DailyStatistic;
use persistence::entities::DeviceEntity;
use persistence::repositories::{
    AlertRepository, DailyStatisticRepository, DailyStatisticUpsert, ReadingRepository,
};

use crate::app::AppState;
use crate::services::ServiceError;

const HOURS_PER_DAY: f64 = 24.0;

/// Recompute and store the daily row for one device and day. Returns None
/// when the device had no readings that day; an existing stale row is left
/// untouched in that case.
pub async fn compute_and_store_day(
    state: &AppState,
    device: &DeviceEntity,
    day: NaiveDate,
) -> Result<Option<DailyStatistic>, ServiceError> {
    let readings = ReadingRepository::new(state.pool.clone());
    let alerts = AlertRepository::new(state.pool.clone());
    let stats = DailyStatisticRepository::new(state.pool.clone());

    let max_gap = state.config.ingestion.max_sample_gap_secs as i64;
    let agg = readings.day_aggregates(&device.id, day, max_gap).await?;
    if agg.sample_count == 0 {
        return Ok(None);
    }

    let energy_rate = state.config_store.energy_rate().await?;
    let co2_factor = state.config_store.co2_factor().await?;

    // Capacity factor: actual energy over the energy a day of nameplate
    // output would produce.
    let capacity_factor = device.rated_capacity_kw.and_then(|capacity| {
        (capacity > 0.0).then(|| agg.total_energy_kwh / (capacity * HOURS_PER_DAY))
    });

    let uptime_hours = (agg.covered_secs / 3600.0).min(HOURS_PER_DAY);
    let downtime_hours = HOURS_PER_DAY - uptime_hours;

    let alert_count = alerts.count_raised_on(&device.id, day).await?;

    let entity = stats
        .upsert(&DailyStatisticUpsert {
            device_id: device.id.clone(),
            stat_date: day,
            total_energy_kwh: agg.total_energy_kwh,
            peak_power_kw: agg.peak_power_kw,
            average_power_kw: agg.average_power_kw,
            average_efficiency: agg.average_efficiency,
            performance_ratio: agg.average_performance_ratio,
            capacity_factor,
            average_irradiance: agg.average_irradiance,
            peak_irradiance: agg.peak_irradiance,
            average_temperature: agg.average_temperature,
            energy_savings: agg.total_energy_kwh * energy_rate.rate_per_kwh,
            co2_offset_kg: agg.total_energy_kwh * co2_factor.kg_per_kwh,
            uptime_hours,
            downtime_hours,
            alert_count,
        })
        .await?;

    Ok(Some(entity.into()))
}
