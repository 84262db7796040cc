//! Domain models for PV Monitor.

pub mod alert;
pub mod daily_statistic;
pub mod device;
pub mod maintenance;
pub mod reading;
pub mod report;
pub mod status;
pub mod system_config;

pub use alert::{Alert, AlertSeverity, AlertStatus};
pub use daily_statistic::DailyStatistic;
pub use device::{Device, DeviceStatus};
pub use maintenance::MaintenanceLog;
pub use reading::Reading;
pub use report::Report;
pub use status::SystemStatus;
pub use system_config::{AlertThresholds, ConfigKey, ConfigValue};
