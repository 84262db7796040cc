//! Offline device sweep background job.

use chrono::{Duration, Utc};
use persistence::repositories::DeviceRepository;
use tracing::info;

use super::scheduler::{Job, JobFrequency};
use crate::app::AppState;

/// Marks online devices without a recent reading as offline. Devices in
/// maintenance are not touched; the next accepted reading flips a swept
/// device back to online.
pub struct OfflineSweepJob {
    state: AppState,
    offline_after_secs: u64,
}

impl OfflineSweepJob {
    pub fn new(state: AppState, offline_after_secs: u64) -> Self {
        Self {
            state,
            offline_after_secs,
        }
    }
}

#[async_trait::async_trait]
impl Job for OfflineSweepJob {
    fn name(&self) -> &'static str {
        "offline_sweep"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(1)
    }

    async fn execute(&self) -> Result<(), String> {
        let cutoff = Utc::now() - Duration::seconds(self.offline_after_secs as i64);

        let swept = DeviceRepository::new(self.state.pool.clone())
            .mark_stale_offline(cutoff)
            .await
            .map_err(|e| e.to_string())?;

        if !swept.is_empty() {
            info!(devices = ?swept, "Marked stale devices offline");
        }
        Ok(())
    }
}
