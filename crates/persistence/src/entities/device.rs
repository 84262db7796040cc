//! Device entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::DeviceStatus;
use sqlx::FromRow;

/// Database row mapping for the devices table.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceEntity {
    pub id: String,
    pub name: String,
    pub device_type: String,
    pub status: String,
    pub location_lat: Option<f64>,
    pub location_lon: Option<f64>,
    pub location_name: Option<String>,
    pub power_output_kw: f64,
    pub efficiency_percent: f64,
    pub temperature_celsius: f64,
    pub voltage: f64,
    pub current: f64,
    pub rated_capacity_kw: Option<f64>,
    pub panel_area_m2: Option<f64>,
    pub installation_date: Option<NaiveDate>,
    pub uptime_percent: f64,
    pub total_energy_generated_kwh: f64,
    pub last_maintenance_date: Option<NaiveDate>,
    pub last_reading_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DeviceEntity> for domain::models::Device {
    fn from(entity: DeviceEntity) -> Self {
        Self {
            status: DeviceStatus::parse(&entity.status).unwrap_or(DeviceStatus::Offline),
            id: entity.id,
            name: entity.name,
            device_type: entity.device_type,
            location_lat: entity.location_lat,
            location_lon: entity.location_lon,
            location_name: entity.location_name,
            power_output_kw: entity.power_output_kw,
            efficiency_percent: entity.efficiency_percent,
            temperature_celsius: entity.temperature_celsius,
            voltage: entity.voltage,
            current: entity.current,
            rated_capacity_kw: entity.rated_capacity_kw,
            panel_area_m2: entity.panel_area_m2,
            installation_date: entity.installation_date,
            uptime_percent: entity.uptime_percent,
            total_energy_generated_kwh: entity.total_energy_generated_kwh,
            last_maintenance_date: entity.last_maintenance_date,
            last_reading_at: entity.last_reading_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_device_entity() -> DeviceEntity {
        DeviceEntity {
            id: "PV-001".to_string(),
            name: "Solar Array A1".to_string(),
            device_type: "solar_panel".to_string(),
            status: "online".to_string(),
            location_lat: Some(48.15),
            location_lon: Some(17.11),
            location_name: Some("Roof A".to_string()),
            power_output_kw: 3.2,
            efficiency_percent: 18.4,
            temperature_celsius: 41.0,
            voltage: 231.0,
            current: 13.8,
            rated_capacity_kw: Some(5.0),
            panel_area_m2: Some(25.0),
            installation_date: None,
            uptime_percent: 99.2,
            total_energy_generated_kwh: 1204.5,
            last_maintenance_date: None,
            last_reading_at: Some(Utc::now()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_device_entity_to_domain() {
        let entity = create_test_device_entity();
        let device: domain::models::Device = entity.clone().into();

        assert_eq!(device.id, entity.id);
        assert_eq!(device.status, DeviceStatus::Online);
        assert_eq!(device.power_output_kw, entity.power_output_kw);
        assert_eq!(device.rated_capacity_kw, entity.rated_capacity_kw);
        assert_eq!(device.total_energy_generated_kwh, 1204.5);
    }

    #[test]
    fn test_unknown_status_maps_to_offline() {
        let mut entity = create_test_device_entity();
        entity.status = "garbage".to_string();
        let device: domain::models::Device = entity.into();
        assert_eq!(device.status, DeviceStatus::Offline);
    }
}
