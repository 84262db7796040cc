use anyhow::Result;
use tracing::info;

use pv_monitor_api::services::config_store::ConfigStore;
use pv_monitor_api::services::ingestion::IngestionService;
use pv_monitor_api::{app, config, jobs, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging
    middleware::logging::init_logging(&config.logging);

    info!("Starting PV Monitor API v{}", env!("CARGO_PKG_VERSION"));

    // Create database pool
    let pool = persistence::db::create_pool(&config.database.pool_settings()).await?;

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    // Seed configuration defaults for keys the operator has not set yet
    let config_store = ConfigStore::new(pool.clone());
    config_store.seed_defaults().await?;

    // Build application
    let state = app::build_state(config.clone(), pool.clone(), config_store);
    let router = app::create_app(state.clone());

    // Start background jobs
    let mut scheduler = jobs::JobScheduler::new();
    scheduler.register(jobs::DailyRollupJob::new(state.clone()));
    scheduler.register(jobs::OfflineSweepJob::new(
        state.clone(),
        config.ingestion.offline_after_secs,
    ));
    scheduler.start();

    // Start the hardware bridge poller if enabled
    let poller_handle = if config.poller.enabled {
        let ingestion = IngestionService::new(state.clone());
        Some(jobs::bridge_poller::spawn(
            ingestion,
            config.poller.clone(),
        ))
    } else {
        info!("Bridge poller disabled");
        None
    };

    // Start server
    let addr = config.socket_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop background work after the server drains
    scheduler.shutdown();
    if let Some(handle) = poller_handle {
        handle.abort();
    }
    scheduler
        .wait_for_shutdown(std::time::Duration::from_secs(10))
        .await;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
