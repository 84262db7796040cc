//! Alert endpoint handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use domain::models::alert::{AcknowledgeAlertRequest, AcknowledgeAlertResponse};
use domain::models::{Alert, AlertStatus};
use persistence::repositories::AlertRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::ServiceError;

/// List open alerts (active and acknowledged), newest first. Terminal
/// alerts stay in the ledger but are not surfaced here.
pub async fn list_alerts(State(state): State<AppState>) -> Result<Json<Vec<Alert>>, ApiError> {
    let alerts = AlertRepository::new(state.pool.clone()).list_open().await?;
    Ok(Json(alerts.into_iter().map(Into::into).collect()))
}

/// Acknowledge an active alert. Only the active state can be acknowledged;
/// anything else is a lifecycle conflict, not a missing resource.
pub async fn acknowledge_alert(
    State(state): State<AppState>,
    Path(alert_id): Path<Uuid>,
    payload: Option<Json<AcknowledgeAlertRequest>>,
) -> Result<Json<AcknowledgeAlertResponse>, ApiError> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let repo = AlertRepository::new(state.pool.clone());

    if let Some(alert) = repo
        .acknowledge(alert_id, request.acknowledged_by.as_deref())
        .await?
    {
        return Ok(Json(AcknowledgeAlertResponse {
            status: AlertStatus::Acknowledged,
            alert_id: alert.id,
        }));
    }

    // The guarded update matched nothing: distinguish a missing alert from
    // one that already left the active state.
    match repo.get(alert_id).await? {
        None => Err(ApiError::NotFound(format!("Alert '{}' not found", alert_id))),
        Some(alert) => Err(ServiceError::AlertTransition(format!(
            "Alert '{}' is {}, only active alerts can be acknowledged",
            alert_id, alert.status
        ))
        .into()),
    }
}
