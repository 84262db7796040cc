//! Report generation endpoint handler.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use domain::models::Report;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::reporting::{self, DEFAULT_REPORT_DAYS};

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub days: Option<u32>,
}

/// Multi-day performance report ending today (UTC). The window defaults to
/// seven days and is clamped to ninety; `days=0` is a 400.
pub async fn get_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Report>, ApiError> {
    let days = query.days.unwrap_or(DEFAULT_REPORT_DAYS);
    let report = reporting::generate_report(&state, days).await?;
    Ok(Json(report))
}
