//! Hardware bridge poller.
//!
//! Pulls readings from a `ReadingSource` and feeds them into the same
//! ingestion pipeline the HTTP surface uses. Source failures back off
//! exponentially up to the configured ceiling; a successful poll resets
//! the cadence.

use std::time::Duration;

use chrono::{Timelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use domain::models::reading::SubmitReadingRequest;

use crate::config::PollerConfig;
use crate::services::ingestion::IngestionService;
use crate::services::ServiceError;

/// A pollable origin of readings. Implementations own their connection
/// state; the poller loop owns scheduling and backoff.
#[async_trait::async_trait]
pub trait ReadingSource: Send {
    fn name(&self) -> &'static str;

    /// Fetch the next batch of readings. A `SourceUnavailable` error
    /// triggers backoff.
    async fn poll(&mut self) -> Result<Vec<SubmitReadingRequest>, ServiceError>;
}

/// Simulated bridge for development and demos: emits plausible readings
/// for a fixed set of device IDs following a daylight curve.
pub struct SimulatedBridgeSource {
    devices: Vec<String>,
    rng: StdRng,
}

impl SimulatedBridgeSource {
    pub fn new(devices: Vec<String>) -> Self {
        Self {
            devices,
            rng: StdRng::from_entropy(),
        }
    }

    /// Clear-sky irradiance for the current UTC hour: a half-sine between
    /// 06:00 and 18:00, zero at night.
    fn base_irradiance(&self) -> f64 {
        let hour = Utc::now().hour() as f64 + Utc::now().minute() as f64 / 60.0;
        if !(6.0..18.0).contains(&hour) {
            return 0.0;
        }
        let phase = (hour - 6.0) / 12.0 * std::f64::consts::PI;
        1000.0 * phase.sin()
    }
}

#[async_trait::async_trait]
impl ReadingSource for SimulatedBridgeSource {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn poll(&mut self) -> Result<Vec<SubmitReadingRequest>, ServiceError> {
        let base = self.base_irradiance();

        let readings = self
            .devices
            .iter()
            .map(|device_id| {
                let irradiance = (base * self.rng.gen_range(0.85..1.05)).max(0.0);
                let ambient = 12.0 + irradiance / 1000.0 * 18.0 + self.rng.gen_range(-2.0..2.0);
                let panel_temp = ambient + irradiance / 1000.0 * 25.0;
                // Assumed 5 kW array with realistic conversion losses
                let power = 5.0 * irradiance / 1000.0 * self.rng.gen_range(0.78..0.92);
                let voltage = 228.0 + self.rng.gen_range(-4.0..4.0);

                SubmitReadingRequest {
                    device_id: device_id.clone(),
                    timestamp: Some(Utc::now().timestamp_millis()),
                    solar_irradiance: Some(irradiance),
                    ambient_temperature: Some(ambient),
                    panel_temperature: Some(panel_temp),
                    humidity: Some(self.rng.gen_range(30.0..70.0)),
                    wind_speed: Some(self.rng.gen_range(0.0..8.0)),
                    power_output_kw: Some(power),
                    voltage: Some(voltage),
                    current: Some(if voltage > 0.0 { power * 1000.0 / voltage } else { 0.0 }),
                    frequency: Some(50.0 + self.rng.gen_range(-0.1..0.1)),
                }
            })
            .collect();

        Ok(readings)
    }
}

/// Spawn the poller loop on the runtime.
pub fn spawn(ingestion: IngestionService, config: PollerConfig) -> JoinHandle<()> {
    tokio::spawn(async move {
        let source: Box<dyn ReadingSource> = match config.source.as_str() {
            "simulated" => Box::new(SimulatedBridgeSource::new(config.simulated_devices.clone())),
            other => {
                warn!(source = other, "Unknown reading source, falling back to simulated");
                Box::new(SimulatedBridgeSource::new(config.simulated_devices.clone()))
            }
        };
        run(ingestion, source, &config).await;
    })
}

async fn run(ingestion: IngestionService, mut source: Box<dyn ReadingSource>, config: &PollerConfig) {
    let base_delay = Duration::from_secs(config.interval_secs.max(1));
    let max_delay = Duration::from_secs(config.max_backoff_secs.max(config.interval_secs));
    let mut delay = base_delay;

    info!(source = source.name(), interval_secs = config.interval_secs, "Bridge poller started");

    loop {
        tokio::time::sleep(delay).await;

        match source.poll().await {
            Ok(readings) => {
                delay = base_delay;
                for reading in readings {
                    let device_id = reading.device_id.clone();
                    if let Err(e) = ingestion.process_reading(reading).await {
                        warn!(device_id = %device_id, error = %e, "Polled reading rejected");
                    }
                }
            }
            Err(e) => {
                delay = (delay * 2).min(max_delay);
                warn!(
                    source = source.name(),
                    error = %e,
                    retry_in_secs = delay.as_secs(),
                    "Reading source unavailable, backing off"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[tokio::test]
    async fn test_simulated_source_emits_valid_readings() {
        let mut source = SimulatedBridgeSource::new(vec![
            "PV-001".to_string(),
            "PV-002".to_string(),
        ]);
        let readings = source.poll().await.unwrap();
        assert_eq!(readings.len(), 2);
        for reading in &readings {
            assert!(reading.validate().is_ok(), "invalid payload: {:?}", reading);
            assert!(reading.solar_irradiance.unwrap() >= 0.0);
            assert!(reading.power_output_kw.unwrap() >= 0.0);
        }
    }

    #[tokio::test]
    async fn test_simulated_source_empty_device_list() {
        let mut source = SimulatedBridgeSource::new(Vec::new());
        assert!(source.poll().await.unwrap().is_empty());
    }
}
