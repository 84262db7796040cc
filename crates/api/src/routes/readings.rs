//! Reading endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use domain::models::reading::{SubmitReadingRequest, SubmitReadingResponse};
use domain::models::Reading;
use persistence::repositories::{DeviceRepository, ReadingRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::ingestion::IngestionService;

const DEFAULT_READINGS_LIMIT: i64 = 50;
const MAX_READINGS_LIMIT: i64 = 500;

/// Submit one sensor reading. Runs the full ingestion pipeline: validation,
/// timestamp resolution, metric derivation, threshold evaluation, the
/// snapshot update, and alert upserts, all in one transaction.
pub async fn submit_reading(
    State(state): State<AppState>,
    Json(payload): Json<SubmitReadingRequest>,
) -> Result<(StatusCode, Json<SubmitReadingResponse>), ApiError> {
    let response = IngestionService::new(state).process_reading(payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[derive(Debug, Deserialize)]
pub struct RecentReadingsQuery {
    pub limit: Option<i64>,
}

/// Latest readings for one device, newest first.
pub async fn list_readings(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
    Query(query): Query<RecentReadingsQuery>,
) -> Result<Json<Vec<Reading>>, ApiError> {
    if DeviceRepository::new(state.pool.clone())
        .get(&device_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound(format!(
            "Device '{}' not found",
            device_id
        )));
    }

    let limit = query
        .limit
        .unwrap_or(DEFAULT_READINGS_LIMIT)
        .clamp(1, MAX_READINGS_LIMIT);
    let readings = ReadingRepository::new(state.pool.clone())
        .list_recent(&device_id, limit)
        .await?;
    Ok(Json(readings.into_iter().map(Into::into).collect()))
}
