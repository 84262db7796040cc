//! Maintenance log endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use domain::models::maintenance::CreateMaintenanceLogRequest;
use domain::models::{DeviceStatus, MaintenanceLog};
use persistence::repositories::{DeviceRepository, MaintenanceLogRepository};

use crate::app::AppState;
use crate::error::ApiError;

/// Maintenance history for one device, newest first.
pub async fn list_maintenance(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> Result<Json<Vec<MaintenanceLog>>, ApiError> {
    let devices = DeviceRepository::new(state.pool.clone());
    if devices.get(&device_id).await?.is_none() {
        return Err(ApiError::NotFound(format!(
            "Device '{}' not found",
            device_id
        )));
    }

    let logs = MaintenanceLogRepository::new(state.pool.clone())
        .list_for_device(&device_id)
        .await?;
    Ok(Json(logs.into_iter().map(Into::into).collect()))
}

/// Record a maintenance event. Updates the device's last-maintenance date;
/// an in-progress event also flips the device into maintenance status so
/// the offline sweep leaves it alone.
pub async fn create_maintenance(
    State(state): State<AppState>,
    Json(payload): Json<CreateMaintenanceLogRequest>,
) -> Result<(StatusCode, Json<MaintenanceLog>), ApiError> {
    payload.validate()?;

    let devices = DeviceRepository::new(state.pool.clone());
    if devices.get(&payload.device_id).await?.is_none() {
        return Err(ApiError::NotFound(format!(
            "Device '{}' not found",
            payload.device_id
        )));
    }

    // The log and its device updates commit together or not at all.
    let mut tx = state.pool.begin().await?;
    let log = MaintenanceLogRepository::new(state.pool.clone())
        .insert(&mut *tx, &payload)
        .await?;
    devices
        .set_last_maintenance(&mut *tx, &log.device_id, log.performed_at.date_naive())
        .await?;
    if log.status == "in_progress" {
        devices
            .set_status(&mut *tx, &log.device_id, DeviceStatus::Maintenance.as_str())
            .await?;
    }
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(log.into())))
}
