//! Operator configuration endpoint handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use domain::models::system_config::ConfigEntry;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfigRequest {
    pub value: serde_json::Value,
    #[serde(default)]
    pub updated_by: Option<String>,
}

/// List all configuration entries as stored.
pub async fn list_config(State(state): State<AppState>) -> Result<Json<Vec<ConfigEntry>>, ApiError> {
    let entries = state.config_store.list_entries().await?;
    Ok(Json(entries))
}

/// Update one configuration value. The value is validated against the key's
/// schema before it is stored; the next evaluation picks it up without a
/// restart.
pub async fn update_config(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(payload): Json<UpdateConfigRequest>,
) -> Result<Json<ConfigEntry>, ApiError> {
    let entry = state
        .config_store
        .update(&key, payload.value, payload.updated_by.as_deref())
        .await?;
    Ok(Json(entry))
}
