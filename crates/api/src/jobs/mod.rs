//! Background job scheduler and job implementations.

pub mod bridge_poller;
mod daily_rollup;
mod offline_sweep;
mod scheduler;

pub use daily_rollup::DailyRollupJob;
pub use offline_sweep::OfflineSweepJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
