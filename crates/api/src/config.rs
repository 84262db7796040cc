use persistence::db::PoolSettings;
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub ingestion: IngestionConfig,
    #[serde(default)]
    pub poller: PollerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            url: self.url.clone(),
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            connect_timeout_secs: self.connect_timeout_secs,
            idle_timeout_secs: self.idle_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Ingestion pipeline policy knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestionConfig {
    /// Create a bare device row when a reading names an unknown device.
    /// Off by default: unknown devices are rejected.
    #[serde(default)]
    pub auto_provision: bool,

    /// Reject out-of-order device timestamps instead of substituting the
    /// ingestion time.
    #[serde(default)]
    pub strict_timestamps: bool,

    /// Gap cap in seconds for energy integration between consecutive
    /// readings. Longer gaps accrue energy only for this duration.
    #[serde(default = "default_max_sample_gap")]
    pub max_sample_gap_secs: u64,

    /// Seconds without a reading before an online device is swept offline.
    #[serde(default = "default_offline_after")]
    pub offline_after_secs: u64,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            auto_provision: false,
            strict_timestamps: false,
            max_sample_gap_secs: default_max_sample_gap(),
            offline_after_secs: default_offline_after(),
        }
    }
}

/// Hardware bridge poller configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PollerConfig {
    /// Whether the poller loop runs at all.
    #[serde(default)]
    pub enabled: bool,

    /// Source kind: currently only "simulated".
    #[serde(default = "default_poller_source")]
    pub source: String,

    /// Seconds between successful poll cycles.
    #[serde(default = "default_poller_interval")]
    pub interval_secs: u64,

    /// Backoff ceiling in seconds after repeated source failures.
    #[serde(default = "default_poller_max_backoff")]
    pub max_backoff_secs: u64,

    /// Device IDs the simulated source reports for.
    #[serde(default)]
    pub simulated_devices: Vec<String>,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            source: default_poller_source(),
            interval_secs: default_poller_interval(),
            max_backoff_secs: default_poller_max_backoff(),
            simulated_devices: Vec::new(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    5
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_max_sample_gap() -> u64 {
    300
}
fn default_offline_after() -> u64 {
    600
}
fn default_poller_source() -> String {
    "simulated".to_string()
}
fn default_poller_interval() -> u64 {
    30
}
fn default_poller_max_backoff() -> u64 {
    300
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with PVM__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("PVM").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration for testing with custom overrides, without
    /// touching config files.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "127.0.0.1"
            port = 0
            request_timeout_secs = 30

            [database]
            url = ""
            max_connections = 5
            min_connections = 1
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "debug"
            format = "pretty"

            [ingestion]
            auto_provision = false
            strict_timestamps = false
            max_sample_gap_secs = 300
            offline_after_secs = 600

            [poller]
            enabled = false
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .expect("Invalid server host/port configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_for_test_defaults() {
        let config = Config::load_for_test(&[]).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(!config.ingestion.auto_provision);
        assert!(!config.ingestion.strict_timestamps);
        assert_eq!(config.ingestion.max_sample_gap_secs, 300);
        assert!(!config.poller.enabled);
    }

    #[test]
    fn test_load_for_test_overrides() {
        let config = Config::load_for_test(&[
            ("ingestion.auto_provision", "true"),
            ("server.port", "9090"),
        ])
        .unwrap();
        assert!(config.ingestion.auto_provision);
        assert_eq!(config.server.port, 9090);
    }
}
