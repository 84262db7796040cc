//! Entity definitions (database row mappings).

mod alert;
mod daily_statistic;
mod device;
mod maintenance_log;
mod reading;
mod system_config;

pub use alert::AlertEntity;
pub use daily_statistic::DailyStatisticEntity;
pub use device::DeviceEntity;
pub use maintenance_log::MaintenanceLogEntity;
pub use reading::{DayAggregatesEntity, ReadingEntity};
pub use system_config::SystemConfigEntity;
