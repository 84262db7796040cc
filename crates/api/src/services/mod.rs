//! Application services: the ingestion pipeline, aggregation, rollups,
//! and the configuration store.

pub mod config_store;
pub mod ingestion;
pub mod reporting;
pub mod rollup;

use thiserror::Error;

/// Failures surfaced by the service layer. Routes convert these into HTTP
/// responses; the poller logs and retries them.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Device '{0}' not found")]
    DeviceNotFound(String),

    #[error("Timestamp ordering violation: {0}")]
    TimestampOrder(String),

    #[error("Invalid alert transition: {0}")]
    AlertTransition(String),

    #[error("Reading source unavailable: {0}")]
    SourceUnavailable(String),

    #[error(transparent)]
    Persistence(#[from] sqlx::Error),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    let message = e
                        .message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "invalid value".to_string());
                    format!("{}: {}", field, message)
                })
            })
            .collect();
        messages.sort();
        ServiceError::Validation(messages.join("; "))
    }
}
