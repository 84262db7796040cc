//! System configuration repository.

use sqlx::PgPool;

use crate::entities::SystemConfigEntity;

const CONFIG_COLUMNS: &str = "key, value, description, updated_by, created_at, updated_at";

/// Repository for system configuration entries.
#[derive(Clone)]
pub struct SystemConfigRepository {
    pool: PgPool,
}

impl SystemConfigRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get all configuration entries.
    pub async fn list(&self) -> Result<Vec<SystemConfigEntity>, sqlx::Error> {
        sqlx::query_as::<_, SystemConfigEntity>(&format!(
            "SELECT {CONFIG_COLUMNS} FROM system_config ORDER BY key"
        ))
        .fetch_all(&self.pool)
        .await
    }

    /// Get a configuration entry by key.
    pub async fn get(&self, key: &str) -> Result<Option<SystemConfigEntity>, sqlx::Error> {
        sqlx::query_as::<_, SystemConfigEntity>(&format!(
            "SELECT {CONFIG_COLUMNS} FROM system_config WHERE key = $1"
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await
    }

    /// Upsert a configuration entry.
    pub async fn upsert(
        &self,
        key: &str,
        value: serde_json::Value,
        description: Option<&str>,
        updated_by: Option<&str>,
    ) -> Result<SystemConfigEntity, sqlx::Error> {
        sqlx::query_as::<_, SystemConfigEntity>(&format!(
            r#"
            INSERT INTO system_config (key, value, description, updated_by)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (key) DO UPDATE
            SET value = $2, description = COALESCE($3, system_config.description),
                updated_by = $4, updated_at = NOW()
            RETURNING {CONFIG_COLUMNS}
            "#
        ))
        .bind(key)
        .bind(value)
        .bind(description)
        .bind(updated_by)
        .fetch_one(&self.pool)
        .await
    }

    /// Seed a default value without overwriting an operator-set one.
    pub async fn seed_default(
        &self,
        key: &str,
        value: serde_json::Value,
        description: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO system_config (key, value, description)
            VALUES ($1, $2, $3)
            ON CONFLICT (key) DO NOTHING
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(description)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
