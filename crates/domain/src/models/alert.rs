//! Alert domain model and lifecycle state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Alert severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertSeverity {
    Info,
    Warn,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Info => "INFO",
            AlertSeverity::Warn => "WARN",
            AlertSeverity::Critical => "CRITICAL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "INFO" => Some(AlertSeverity::Info),
            "WARN" => Some(AlertSeverity::Warn),
            "CRITICAL" => Some(AlertSeverity::Critical),
            _ => None,
        }
    }
}

/// Alert lifecycle status. Transitions are forward-only: active alerts can be
/// acknowledged, dismissed, or resolved; acknowledged alerts can still be
/// resolved; resolved and dismissed are terminal. A fresh breach of the same
/// metric creates a new alert rather than reopening a terminal one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Acknowledged,
    Resolved,
    Dismissed,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Active => "active",
            AlertStatus::Acknowledged => "acknowledged",
            AlertStatus::Resolved => "resolved",
            AlertStatus::Dismissed => "dismissed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(AlertStatus::Active),
            "acknowledged" => Some(AlertStatus::Acknowledged),
            "resolved" => Some(AlertStatus::Resolved),
            "dismissed" => Some(AlertStatus::Dismissed),
            _ => None,
        }
    }

    /// Whether a transition from `self` to `next` is allowed by the
    /// forward-only lifecycle.
    pub fn can_transition_to(&self, next: AlertStatus) -> bool {
        use AlertStatus::*;
        matches!(
            (self, next),
            (Active, Acknowledged) | (Active, Dismissed) | (Active, Resolved) | (Acknowledged, Resolved)
        )
    }

    /// Whether this status admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AlertStatus::Resolved | AlertStatus::Dismissed)
    }
}

/// Metric names used by the threshold rules. Stored as display strings so the
/// alert ledger reads naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertMetric {
    Temperature,
    PowerOutput,
    Irradiance,
    Efficiency,
}

impl AlertMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertMetric::Temperature => "Temperature",
            AlertMetric::PowerOutput => "Power Output",
            AlertMetric::Irradiance => "Irradiance",
            AlertMetric::Efficiency => "Efficiency",
        }
    }
}

/// An alert ledger record. Lifecycle is independent of the time series that
/// produced it; rows are never physically deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: Uuid,
    /// None for system-wide alerts.
    pub device_id: Option<String>,
    pub metric: String,
    pub severity: AlertSeverity,
    pub value: f64,
    pub threshold: f64,
    pub message: String,
    pub status: AlertStatus,
    pub acknowledged_by: Option<String>,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
    pub raised_at: DateTime<Utc>,
    pub last_observed_at: DateTime<Utc>,
}

/// What the ingestion pipeline did to an alert during one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertAction {
    Created,
    Updated,
    Resolved,
}

/// One alert touched by a single ingestion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertChange {
    pub alert_id: Uuid,
    pub action: AlertAction,
    pub metric: String,
    pub severity: AlertSeverity,
    pub value: f64,
    pub threshold: f64,
    pub message: String,
}

/// Request payload for alert acknowledgement.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcknowledgeAlertRequest {
    #[serde(default)]
    pub acknowledged_by: Option<String>,
}

/// Response payload for alert acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcknowledgeAlertResponse {
    pub status: AlertStatus,
    pub alert_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(AlertSeverity::Critical > AlertSeverity::Warn);
        assert!(AlertSeverity::Warn > AlertSeverity::Info);
    }

    #[test]
    fn test_severity_round_trip() {
        for sev in [
            AlertSeverity::Info,
            AlertSeverity::Warn,
            AlertSeverity::Critical,
        ] {
            assert_eq!(AlertSeverity::parse(sev.as_str()), Some(sev));
        }
        assert_eq!(AlertSeverity::parse("FATAL"), None);
    }

    #[test]
    fn test_status_forward_only_transitions() {
        use AlertStatus::*;
        assert!(Active.can_transition_to(Acknowledged));
        assert!(Active.can_transition_to(Dismissed));
        assert!(Active.can_transition_to(Resolved));
        assert!(Acknowledged.can_transition_to(Resolved));

        // No reverse or terminal transitions
        assert!(!Acknowledged.can_transition_to(Active));
        assert!(!Resolved.can_transition_to(Active));
        assert!(!Resolved.can_transition_to(Acknowledged));
        assert!(!Dismissed.can_transition_to(Resolved));
        assert!(!Dismissed.can_transition_to(Acknowledged));
    }

    #[test]
    fn test_status_terminal() {
        assert!(!AlertStatus::Active.is_terminal());
        assert!(!AlertStatus::Acknowledged.is_terminal());
        assert!(AlertStatus::Resolved.is_terminal());
        assert!(AlertStatus::Dismissed.is_terminal());
    }

    #[test]
    fn test_metric_display_names() {
        assert_eq!(AlertMetric::Temperature.as_str(), "Temperature");
        assert_eq!(AlertMetric::PowerOutput.as_str(), "Power Output");
    }

    #[test]
    fn test_alert_change_serialization() {
        let change = AlertChange {
            alert_id: Uuid::new_v4(),
            action: AlertAction::Created,
            metric: "Temperature".to_string(),
            severity: AlertSeverity::Critical,
            value: 81.2,
            threshold: 75.0,
            message: "Panel temperature 81.2 °C exceeds threshold 75.0 °C".to_string(),
        };
        let json = serde_json::to_string(&change).unwrap();
        assert!(json.contains("\"action\":\"created\""));
        assert!(json.contains("\"severity\":\"CRITICAL\""));
    }

    #[test]
    fn test_status_serde_lowercase() {
        let json = serde_json::to_string(&AlertStatus::Acknowledged).unwrap();
        assert_eq!(json, "\"acknowledged\"");
    }
}
