//! Repository implementations.

mod alert;
mod daily_statistic;
mod device;
mod maintenance_log;
mod reading;
mod system_config;

pub use alert::{AlertRepository, AlertUpsert, SeverityCountRow};
pub use daily_statistic::{DailyStatisticRepository, DailyStatisticUpsert};
pub use device::{DeviceRepository, SnapshotUpdate};
pub use maintenance_log::MaintenanceLogRepository;
pub use reading::{NewReading, ReadingRepository};
pub use system_config::SystemConfigRepository;
