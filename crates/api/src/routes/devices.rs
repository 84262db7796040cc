//! Device endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use domain::models::device::ProvisionDeviceRequest;
use domain::models::Device;
use persistence::repositories::DeviceRepository;

use crate::app::AppState;
use crate::error::ApiError;

/// List all devices with their live snapshots.
pub async fn list_devices(State(state): State<AppState>) -> Result<Json<Vec<Device>>, ApiError> {
    let devices = DeviceRepository::new(state.pool.clone()).list().await?;
    Ok(Json(devices.into_iter().map(Into::into).collect()))
}

/// Provision a device ahead of its first reading. A duplicate ID is a
/// conflict; auto-provisioning on ingest covers the unplanned case.
pub async fn provision_device(
    State(state): State<AppState>,
    Json(payload): Json<ProvisionDeviceRequest>,
) -> Result<(StatusCode, Json<Device>), ApiError> {
    payload.validate()?;
    let device = DeviceRepository::new(state.pool.clone())
        .insert(&payload)
        .await?;
    Ok((StatusCode::CREATED, Json(device.into())))
}

/// Get one device by ID.
pub async fn get_device(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> Result<Json<Device>, ApiError> {
    let device = DeviceRepository::new(state.pool.clone())
        .get(&device_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Device '{}' not found", device_id)))?;
    Ok(Json(device.into()))
}
