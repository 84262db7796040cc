//! Typed system configuration values.
//!
//! Each config key maps to an explicit schema, validated at the
//! Configuration Store boundary instead of being trusted as opaque JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The recognized configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    AlertThresholds,
    EnergyRate,
    Co2Factor,
    MaintenanceSchedule,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::AlertThresholds,
        ConfigKey::EnergyRate,
        ConfigKey::Co2Factor,
        ConfigKey::MaintenanceSchedule,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::AlertThresholds => "alert_thresholds",
            ConfigKey::EnergyRate => "energy_rate",
            ConfigKey::Co2Factor => "co2_factor",
            ConfigKey::MaintenanceSchedule => "maintenance_schedule",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "alert_thresholds" => Some(ConfigKey::AlertThresholds),
            "energy_rate" => Some(ConfigKey::EnergyRate),
            "co2_factor" => Some(ConfigKey::Co2Factor),
            "maintenance_schedule" => Some(ConfigKey::MaintenanceSchedule),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ConfigKey::AlertThresholds => "Alert threshold values for system monitoring",
            ConfigKey::EnergyRate => "Electricity rate per kWh for savings calculation",
            ConfigKey::Co2Factor => "CO2 emission factor in kg per kWh",
            ConfigKey::MaintenanceSchedule => "Maintenance schedule intervals in days",
        }
    }
}

/// Error produced when a stored or submitted config value does not match the
/// schema for its key.
#[derive(Debug, Error)]
#[error("Invalid value for config key '{key}': {reason}")]
pub struct ConfigValueError {
    pub key: String,
    pub reason: String,
}

/// Alert threshold parameters driving the evaluation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Irradiance floor in W/m².
    pub low_irradiance: f64,
    /// Consecutive readings below the floor before alerting.
    pub low_irradiance_duration: u32,
    /// Percent deficit against expected output before alerting.
    pub power_drop_percent: f64,
    /// Panel temperature ceiling in °C.
    pub high_temp: f64,
    /// Efficiency floor in percent.
    pub low_efficiency: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            low_irradiance: 50.0,
            low_irradiance_duration: 3,
            power_drop_percent: 40.0,
            high_temp: 75.0,
            low_efficiency: 10.0,
        }
    }
}

/// Electricity tariff used for financial savings figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyRate {
    pub rate_per_kwh: f64,
}

impl Default for EnergyRate {
    fn default() -> Self {
        Self { rate_per_kwh: 7.5 }
    }
}

/// CO₂ emission factor used for offset figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Co2Factor {
    pub kg_per_kwh: f64,
}

impl Default for Co2Factor {
    fn default() -> Self {
        Self { kg_per_kwh: 0.82 }
    }
}

/// Maintenance interval schedule in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceSchedule {
    pub panel_cleaning_days: u32,
    pub inspection_days: u32,
    pub major_service_days: u32,
}

impl Default for MaintenanceSchedule {
    fn default() -> Self {
        Self {
            panel_cleaning_days: 90,
            inspection_days: 180,
            major_service_days: 365,
        }
    }
}

/// A configuration value tagged by its key's schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    AlertThresholds(AlertThresholds),
    EnergyRate(EnergyRate),
    Co2Factor(Co2Factor),
    MaintenanceSchedule(MaintenanceSchedule),
}

impl ConfigValue {
    /// The key this value belongs to.
    pub fn key(&self) -> ConfigKey {
        match self {
            ConfigValue::AlertThresholds(_) => ConfigKey::AlertThresholds,
            ConfigValue::EnergyRate(_) => ConfigKey::EnergyRate,
            ConfigValue::Co2Factor(_) => ConfigKey::Co2Factor,
            ConfigValue::MaintenanceSchedule(_) => ConfigKey::MaintenanceSchedule,
        }
    }

    /// The seeded default for a key.
    pub fn default_for(key: ConfigKey) -> Self {
        match key {
            ConfigKey::AlertThresholds => ConfigValue::AlertThresholds(AlertThresholds::default()),
            ConfigKey::EnergyRate => ConfigValue::EnergyRate(EnergyRate::default()),
            ConfigKey::Co2Factor => ConfigValue::Co2Factor(Co2Factor::default()),
            ConfigKey::MaintenanceSchedule => {
                ConfigValue::MaintenanceSchedule(MaintenanceSchedule::default())
            }
        }
    }

    /// Parses and validates raw JSON against the schema for `key`.
    pub fn from_json(key: ConfigKey, value: serde_json::Value) -> Result<Self, ConfigValueError> {
        let invalid = |e: serde_json::Error| ConfigValueError {
            key: key.as_str().to_string(),
            reason: e.to_string(),
        };
        match key {
            ConfigKey::AlertThresholds => serde_json::from_value(value)
                .map(ConfigValue::AlertThresholds)
                .map_err(invalid),
            ConfigKey::EnergyRate => serde_json::from_value(value)
                .map(ConfigValue::EnergyRate)
                .map_err(invalid),
            ConfigKey::Co2Factor => serde_json::from_value(value)
                .map(ConfigValue::Co2Factor)
                .map_err(invalid),
            ConfigKey::MaintenanceSchedule => serde_json::from_value(value)
                .map(ConfigValue::MaintenanceSchedule)
                .map_err(invalid),
        }
    }

    /// Serializes back to raw JSON for storage.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ConfigValue::AlertThresholds(v) => serde_json::to_value(v),
            ConfigValue::EnergyRate(v) => serde_json::to_value(v),
            ConfigValue::Co2Factor(v) => serde_json::to_value(v),
            ConfigValue::MaintenanceSchedule(v) => serde_json::to_value(v),
        }
        .unwrap_or(serde_json::Value::Null)
    }
}

/// A config entry as exposed over the operator surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigEntry {
    pub key: String,
    pub value: serde_json::Value,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_key_round_trip() {
        for key in ConfigKey::ALL {
            assert_eq!(ConfigKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(ConfigKey::parse("unknown_key"), None);
    }

    #[test]
    fn test_defaults_match_seeded_values() {
        let thresholds = AlertThresholds::default();
        assert_eq!(thresholds.low_irradiance, 50.0);
        assert_eq!(thresholds.low_irradiance_duration, 3);
        assert_eq!(thresholds.power_drop_percent, 40.0);
        assert_eq!(thresholds.high_temp, 75.0);
        assert_eq!(thresholds.low_efficiency, 10.0);

        assert_eq!(EnergyRate::default().rate_per_kwh, 7.5);
        assert_eq!(Co2Factor::default().kg_per_kwh, 0.82);

        let schedule = MaintenanceSchedule::default();
        assert_eq!(schedule.panel_cleaning_days, 90);
        assert_eq!(schedule.inspection_days, 180);
        assert_eq!(schedule.major_service_days, 365);
    }

    #[test]
    fn test_from_json_valid() {
        let value = json!({
            "low_irradiance": 40.0,
            "low_irradiance_duration": 5,
            "power_drop_percent": 30.0,
            "high_temp": 80.0,
            "low_efficiency": 12.0
        });
        let parsed = ConfigValue::from_json(ConfigKey::AlertThresholds, value).unwrap();
        match parsed {
            ConfigValue::AlertThresholds(t) => {
                assert_eq!(t.low_irradiance, 40.0);
                assert_eq!(t.low_irradiance_duration, 5);
            }
            other => panic!("Expected AlertThresholds, got {:?}", other),
        }
    }

    #[test]
    fn test_from_json_rejects_schema_mismatch() {
        let value = json!({"rate_per_kwh": "not a number"});
        let result = ConfigValue::from_json(ConfigKey::EnergyRate, value);
        assert!(result.is_err());

        // Value shaped for a different key is rejected too
        let value = json!({"kg_per_kwh": 0.82});
        assert!(ConfigValue::from_json(ConfigKey::EnergyRate, value).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        for key in ConfigKey::ALL {
            let value = ConfigValue::default_for(key);
            let json = value.to_json();
            let back = ConfigValue::from_json(key, json).unwrap();
            assert_eq!(back, value);
        }
    }
}
