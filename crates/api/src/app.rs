use axum::{
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::routes::{alerts, config as config_routes, devices, health, maintenance, readings, reports, root, status};
use crate::services::config_store::ConfigStore;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub config_store: ConfigStore,
}

pub fn build_state(config: Config, pool: PgPool, config_store: ConfigStore) -> AppState {
    AppState {
        pool,
        config: Arc::new(config),
        config_store,
    }
}

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let request_timeout = state.config.server.request_timeout_secs;

    Router::new()
        // Liveness root
        .route("/", get(root::service_info))
        // Health probes
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        // Ingestion and per-device history
        .route("/readings", post(readings::submit_reading))
        .route(
            "/devices/:device_id/readings",
            get(readings::list_readings),
        )
        // Aggregation surfaces
        .route("/status", get(status::get_system_status))
        .route("/report", get(reports::get_report))
        // Alert lifecycle
        .route("/alerts", get(alerts::list_alerts))
        .route("/alerts/:alert_id/ack", post(alerts::acknowledge_alert))
        // Device management
        .route("/devices", get(devices::list_devices).post(devices::provision_device))
        .route("/devices/:device_id", get(devices::get_device))
        .route(
            "/devices/:device_id/maintenance",
            get(maintenance::list_maintenance),
        )
        // Maintenance logging
        .route("/maintenance", post(maintenance::create_maintenance))
        // Operator configuration
        .route("/config", get(config_routes::list_config))
        .route("/config/:key", put(config_routes::update_config))
        // Global middleware (order matters: bottom layers run first)
        .layer(TimeoutLayer::new(Duration::from_secs(request_timeout)))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
