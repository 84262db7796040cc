//! System status endpoint handler.

use axum::{extract::State, Json};

use domain::models::SystemStatus;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::reporting;

/// Live system status: per-device snapshots plus the fleet-wide rollup.
pub async fn get_system_status(
    State(state): State<AppState>,
) -> Result<Json<SystemStatus>, ApiError> {
    let status = reporting::get_system_status(&state).await?;
    Ok(Json(status))
}
