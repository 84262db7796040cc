//! Reading ingestion pipeline.
//!
//! One submitted reading runs through a single database transaction that
//! holds the device row lock: timestamp resolution, metric derivation,
//! threshold evaluation, the reading insert, the snapshot update, and the
//! alert upserts/resolutions all commit or roll back together. Concurrent
//! submissions for the same device serialize on the row lock; submissions
//! for different devices do not contend.

use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, info};
use validator::Validate;

use domain::models::alert::{AlertAction, AlertChange, AlertSeverity};
use domain::models::reading::{SubmitReadingRequest, SubmitReadingResponse};
use domain::services::derive::{derive_metrics, DerivedMetrics};
use domain::services::thresholds::{self, ReadingSample, ThresholdEvent};
use persistence::entities::DeviceEntity;
use persistence::repositories::{
    AlertRepository, AlertUpsert, DeviceRepository, NewReading, ReadingRepository, SnapshotUpdate,
};

use crate::app::AppState;
use crate::services::ServiceError;

#[derive(Clone)]
pub struct IngestionService {
    state: AppState,
    devices: DeviceRepository,
    readings: ReadingRepository,
    alerts: AlertRepository,
}

impl IngestionService {
    pub fn new(state: AppState) -> Self {
        let pool = state.pool.clone();
        Self {
            state,
            devices: DeviceRepository::new(pool.clone()),
            readings: ReadingRepository::new(pool.clone()),
            alerts: AlertRepository::new(pool),
        }
    }

    /// Process one reading submission end to end. Both the HTTP handler and
    /// the bridge poller call this; the pipeline does not care where the
    /// payload came from.
    pub async fn process_reading(
        &self,
        payload: SubmitReadingRequest,
    ) -> Result<SubmitReadingResponse, ServiceError> {
        payload.validate()?;

        let thresholds = self.state.config_store.alert_thresholds().await?;

        let mut tx = self.state.pool.begin().await.map_err(ServiceError::from)?;

        let device = match self.devices.lock_for_ingest(&mut *tx, &payload.device_id).await? {
            Some(device) => device,
            None if self.state.config.ingestion.auto_provision => {
                info!(device_id = %payload.device_id, "Auto-provisioning unknown device");
                self.devices
                    .insert_auto_provisioned(&mut *tx, &payload.device_id)
                    .await?
            }
            None => return Err(ServiceError::DeviceNotFound(payload.device_id)),
        };

        let captured_at = self.resolve_timestamp(&payload, &device)?;

        let derived = derive_metrics(&payload, device.rated_capacity_kw, device.panel_area_m2);

        // Irradiance history for the consecutive-duration rule, excluding
        // the reading being ingested.
        let prior_irradiance = if payload.solar_irradiance.is_some() {
            let needed = thresholds.low_irradiance_duration.saturating_sub(1) as i64;
            if needed > 0 {
                self.readings
                    .recent_irradiance(&mut *tx, &device.id, needed)
                    .await?
            } else {
                Vec::new()
            }
        } else {
            Vec::new()
        };

        let sample = ReadingSample {
            solar_irradiance: payload.solar_irradiance,
            panel_temperature: payload.panel_temperature,
            power_output_kw: payload.power_output_kw,
        };
        let events = thresholds::evaluate(
            sample,
            &derived,
            device.rated_capacity_kw,
            &prior_irradiance,
            &thresholds,
        );

        let reading_id = self
            .readings
            .insert(&mut *tx, &new_reading(&payload, captured_at, &derived))
            .await?;

        let energy_delta = energy_delta_kwh(
            &device,
            payload.power_output_kw,
            captured_at,
            self.state.config.ingestion.max_sample_gap_secs,
        );

        self.devices
            .apply_snapshot(
                &mut *tx,
                &device.id,
                &SnapshotUpdate {
                    power_output_kw: payload.power_output_kw,
                    efficiency_percent: derived.efficiency_percent,
                    temperature_celsius: payload.panel_temperature,
                    voltage: payload.voltage,
                    current: payload.current,
                    energy_delta_kwh: energy_delta,
                    captured_at,
                },
            )
            .await?;

        let mut changes = Vec::new();
        for event in events {
            match event {
                ThresholdEvent::Breach {
                    metric,
                    severity,
                    value,
                    threshold,
                    message,
                } => {
                    let (alert, created) = self
                        .alerts
                        .upsert_active(
                            &mut *tx,
                            &AlertUpsert {
                                device_id: device.id.clone(),
                                metric: metric.as_str().to_string(),
                                severity: severity.as_str().to_string(),
                                value,
                                threshold,
                                message: message.clone(),
                                context: Some(serde_json::json!({ "readingId": reading_id })),
                            },
                        )
                        .await?;
                    changes.push(AlertChange {
                        alert_id: alert.id,
                        action: if created {
                            AlertAction::Created
                        } else {
                            AlertAction::Updated
                        },
                        metric: alert.metric,
                        severity,
                        value,
                        threshold,
                        message,
                    });
                }
                ThresholdEvent::Clear { metric } => {
                    if let Some(alert) = self
                        .alerts
                        .resolve_for_metric(&mut *tx, &device.id, metric.as_str())
                        .await?
                    {
                        changes.push(AlertChange {
                            alert_id: alert.id,
                            action: AlertAction::Resolved,
                            severity: AlertSeverity::parse(&alert.severity)
                                .unwrap_or(AlertSeverity::Info),
                            metric: alert.metric,
                            value: alert.value,
                            threshold: alert.threshold,
                            message: alert.message,
                        });
                    }
                }
            }
        }

        tx.commit().await.map_err(ServiceError::from)?;

        debug!(
            device_id = %device.id,
            reading_id,
            alerts = changes.len(),
            "Reading ingested"
        );

        Ok(SubmitReadingResponse {
            reading_id,
            alerts: changes,
        })
    }

    /// Resolve the reading's timestamp against the device's stored history.
    /// A missing or regressed device timestamp gets the ingestion time, so
    /// the per-device series stays monotonic; strict mode rejects the
    /// regression instead.
    fn resolve_timestamp(
        &self,
        payload: &SubmitReadingRequest,
        device: &DeviceEntity,
    ) -> Result<DateTime<Utc>, ServiceError> {
        let now = Utc::now();

        let Some(millis) = payload.timestamp else {
            return Ok(now);
        };

        let claimed = match Utc.timestamp_millis_opt(millis) {
            chrono::LocalResult::Single(ts) => ts,
            _ => {
                return Err(ServiceError::Validation(format!(
                    "Timestamp {} is not a valid epoch-milliseconds value",
                    millis
                )))
            }
        };

        if let Some(last) = device.last_reading_at {
            if claimed < last {
                if self.state.config.ingestion.strict_timestamps {
                    return Err(ServiceError::TimestampOrder(format!(
                        "Timestamp {} is older than the last stored reading at {}",
                        claimed, last
                    )));
                }
                debug!(
                    device_id = %device.id,
                    claimed = %claimed,
                    last = %last,
                    "Out-of-order device timestamp, substituting ingestion time"
                );
                return Ok(now);
            }
        }

        Ok(claimed)
    }
}

fn new_reading(
    payload: &SubmitReadingRequest,
    captured_at: DateTime<Utc>,
    derived: &DerivedMetrics,
) -> NewReading {
    NewReading {
        device_id: payload.device_id.clone(),
        captured_at,
        solar_irradiance: payload.solar_irradiance,
        ambient_temperature: payload.ambient_temperature,
        panel_temperature: payload.panel_temperature,
        humidity: payload.humidity,
        wind_speed: payload.wind_speed,
        power_output_kw: payload.power_output_kw,
        voltage: payload.voltage,
        current: payload.current,
        frequency: payload.frequency,
        efficiency_percent: derived.efficiency_percent,
        performance_ratio: derived.performance_ratio,
        data_quality_score: derived.data_quality_score,
    }
}

/// Trapezoidal energy increment between the previous snapshot and this
/// reading, with the gap clamped so an outage does not accrue phantom
/// generation.
fn energy_delta_kwh(
    device: &DeviceEntity,
    power_output_kw: Option<f64>,
    captured_at: DateTime<Utc>,
    max_gap_secs: u64,
) -> f64 {
    let (Some(power), Some(last)) = (power_output_kw, device.last_reading_at) else {
        return 0.0;
    };

    let gap_secs = (captured_at - last).num_seconds();
    if gap_secs <= 0 {
        return 0.0;
    }

    let clamped_secs = (gap_secs as u64).min(max_gap_secs) as f64;
    ((device.power_output_kw + power) / 2.0) * (clamped_secs / 3600.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn device_with(power: f64, last_reading_at: Option<DateTime<Utc>>) -> DeviceEntity {
        DeviceEntity {
            id: "PV-001".to_string(),
            name: "Solar Array A1".to_string(),
            device_type: "solar_panel".to_string(),
            status: "online".to_string(),
            location_lat: None,
            location_lon: None,
            location_name: None,
            power_output_kw: power,
            efficiency_percent: 0.0,
            temperature_celsius: 0.0,
            voltage: 0.0,
            current: 0.0,
            rated_capacity_kw: Some(5.0),
            panel_area_m2: Some(25.0),
            installation_date: None,
            uptime_percent: 100.0,
            total_energy_generated_kwh: 0.0,
            last_maintenance_date: None,
            last_reading_at,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_energy_delta_trapezoid() {
        let now = Utc::now();
        let device = device_with(3.0, Some(now - Duration::seconds(60)));
        // (3.0 + 4.0) / 2 kW over 60 s = 3.5 * 60/3600 kWh
        let delta = energy_delta_kwh(&device, Some(4.0), now, 300);
        assert!((delta - 3.5 * 60.0 / 3600.0).abs() < 1e-9);
    }

    #[test]
    fn test_energy_delta_gap_clamped() {
        let now = Utc::now();
        // Two hours since the last reading, clamped to 300 s
        let device = device_with(2.0, Some(now - Duration::hours(2)));
        let delta = energy_delta_kwh(&device, Some(2.0), now, 300);
        assert!((delta - 2.0 * 300.0 / 3600.0).abs() < 1e-9);
    }

    #[test]
    fn test_energy_delta_first_reading_is_zero() {
        let device = device_with(0.0, None);
        assert_eq!(energy_delta_kwh(&device, Some(4.0), Utc::now(), 300), 0.0);
    }

    #[test]
    fn test_energy_delta_without_power_is_zero() {
        let now = Utc::now();
        let device = device_with(3.0, Some(now - Duration::seconds(60)));
        assert_eq!(energy_delta_kwh(&device, None, now, 300), 0.0);
    }
}
