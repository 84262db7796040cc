//! Configuration store: typed, cached access to the system_config table.
//!
//! Reads go through an in-memory cache so the ingestion hot path does not
//! hit the database for thresholds on every reading. Operator writes update
//! the table and invalidate the cached entry, so the next evaluation sees
//! the new value without a restart.

use std::collections::HashMap;
use std::sync::Arc;

use domain::models::system_config::{Co2Factor, ConfigEntry, EnergyRate};
use domain::models::{AlertThresholds, ConfigKey, ConfigValue};
use persistence::repositories::SystemConfigRepository;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::info;

use crate::services::ServiceError;

#[derive(Clone)]
pub struct ConfigStore {
    repo: SystemConfigRepository,
    cache: Arc<RwLock<HashMap<ConfigKey, ConfigValue>>>,
}

impl ConfigStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: SystemConfigRepository::new(pool),
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Seed defaults for any key the operator has not set. Existing values
    /// are never overwritten.
    pub async fn seed_defaults(&self) -> Result<(), sqlx::Error> {
        for key in ConfigKey::ALL {
            let value = ConfigValue::default_for(key);
            self.repo
                .seed_default(key.as_str(), value.to_json(), key.description())
                .await?;
        }
        info!("Configuration defaults seeded");
        Ok(())
    }

    /// Typed value for a key, read through the cache. A stored value that no
    /// longer parses against the key's schema falls back to the default
    /// rather than poisoning the pipeline.
    pub async fn get(&self, key: ConfigKey) -> Result<ConfigValue, ServiceError> {
        if let Some(value) = self.cache.read().await.get(&key) {
            return Ok(value.clone());
        }

        let value = match self.repo.get(key.as_str()).await? {
            Some(entity) => ConfigValue::from_json(key, entity.value)
                .unwrap_or_else(|e| {
                    tracing::warn!(key = key.as_str(), error = %e, "Stored config value invalid, using default");
                    ConfigValue::default_for(key)
                }),
            None => ConfigValue::default_for(key),
        };

        self.cache.write().await.insert(key, value.clone());
        Ok(value)
    }

    pub async fn alert_thresholds(&self) -> Result<AlertThresholds, ServiceError> {
        match self.get(ConfigKey::AlertThresholds).await? {
            ConfigValue::AlertThresholds(t) => Ok(t),
            _ => Ok(AlertThresholds::default()),
        }
    }

    pub async fn energy_rate(&self) -> Result<EnergyRate, ServiceError> {
        match self.get(ConfigKey::EnergyRate).await? {
            ConfigValue::EnergyRate(r) => Ok(r),
            _ => Ok(EnergyRate::default()),
        }
    }

    pub async fn co2_factor(&self) -> Result<Co2Factor, ServiceError> {
        match self.get(ConfigKey::Co2Factor).await? {
            ConfigValue::Co2Factor(f) => Ok(f),
            _ => Ok(Co2Factor::default()),
        }
    }

    /// All entries as stored, for the operator surface.
    pub async fn list_entries(&self) -> Result<Vec<ConfigEntry>, ServiceError> {
        let entities = self.repo.list().await?;
        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// Validate and store an operator-submitted value, then invalidate the
    /// cached entry so the next read sees it.
    pub async fn update(
        &self,
        key_str: &str,
        value: serde_json::Value,
        updated_by: Option<&str>,
    ) -> Result<ConfigEntry, ServiceError> {
        let key = ConfigKey::parse(key_str).ok_or_else(|| {
            ServiceError::Validation(format!("Unknown configuration key '{}'", key_str))
        })?;

        let typed = ConfigValue::from_json(key, value)
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let entity = self
            .repo
            .upsert(key.as_str(), typed.to_json(), None, updated_by)
            .await?;

        self.cache.write().await.remove(&key);
        info!(key = key.as_str(), "Configuration updated");

        Ok(entity.into())
    }
}
