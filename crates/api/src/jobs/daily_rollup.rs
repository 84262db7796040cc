//! Daily statistics rollup background job.

use std::collections::HashSet;

use chrono::{Duration, Utc};
use persistence::repositories::{DeviceRepository, ReadingRepository};
use tracing::info;

use super::scheduler::{Job, JobFrequency};
use crate::app::AppState;
use crate::services::rollup;

/// Recomputes per-device daily statistics. Runs hourly: the current day's
/// row converges as readings arrive, and the first run after midnight
/// finalizes the previous day.
pub struct DailyRollupJob {
    state: AppState,
}

impl DailyRollupJob {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait::async_trait]
impl Job for DailyRollupJob {
    fn name(&self) -> &'static str {
        "daily_rollup"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Hourly
    }

    async fn execute(&self) -> Result<(), String> {
        let device_repo = DeviceRepository::new(self.state.pool.clone());
        let devices = device_repo.list().await.map_err(|e| e.to_string())?;

        let readings = ReadingRepository::new(self.state.pool.clone());
        let today = Utc::now().date_naive();
        let yesterday = today - Duration::days(1);

        let mut rows = 0usize;
        for day in [yesterday, today] {
            let with_readings: HashSet<String> = readings
                .device_ids_with_readings_on(day)
                .await
                .map_err(|e| e.to_string())?
                .into_iter()
                .collect();

            for device in devices.iter().filter(|d| with_readings.contains(&d.id)) {
                let updated = rollup::compute_and_store_day(&self.state, device, day)
                    .await
                    .map_err(|e| e.to_string())?;
                if let Some(stat) = updated {
                    rows += 1;
                    // Yesterday's finalized coverage refreshes the lifetime
                    // uptime counter; today's row is still converging.
                    if day == yesterday {
                        device_repo
                            .set_uptime_percent(&device.id, stat.uptime_hours / 24.0 * 100.0)
                            .await
                            .map_err(|e| e.to_string())?;
                    }
                }
            }
        }

        info!(devices = devices.len(), rows, "Daily rollup complete");
        Ok(())
    }
}
