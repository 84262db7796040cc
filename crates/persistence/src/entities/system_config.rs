//! System configuration entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the system_config table.
#[derive(Debug, Clone, FromRow)]
pub struct SystemConfigEntity {
    pub key: String,
    pub value: serde_json::Value,
    pub description: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SystemConfigEntity> for domain::models::system_config::ConfigEntry {
    fn from(entity: SystemConfigEntity) -> Self {
        Self {
            key: entity.key,
            value: entity.value,
            description: entity.description,
            updated_at: entity.updated_at,
            updated_by: entity.updated_by,
        }
    }
}
