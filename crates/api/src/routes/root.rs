//! Service info endpoint handler.

use axum::Json;
use serde::Serialize;

/// Service identity returned at the root path.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
}

pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "pv-monitor",
        version: env!("CARGO_PKG_VERSION"),
        status: "ok",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_service_info() {
        let Json(info) = service_info().await;
        assert_eq!(info.service, "pv-monitor");
        assert_eq!(info.status, "ok");
        assert!(!info.version.is_empty());
    }
}
