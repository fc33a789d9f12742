//! Read-only status reporting for operational tooling.
//!
//! The probe surface answers "what is configured and is it switched on"
//! without touching the validation pipeline: aggregate counts plus a
//! per-connector identity/config echo, serializable for a diagnostics
//! endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::connector::{config::ConnectorConfig, registry::ConnectorRegistry};

/// Aggregate status of all configured connectors.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    /// Number of configured connectors.
    pub total_count: usize,
    /// Number of active connectors.
    pub active_count: usize,
    /// When this report was produced.
    pub generated_at: DateTime<Utc>,
    /// Per-connector configuration echo.
    pub connectors: Vec<ConnectorEcho>,
}

/// Identity and configuration echo of one connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorEcho {
    /// Display name.
    pub name: String,
    /// Configured base URL.
    pub base_url: String,
    /// Configured API version tag.
    pub api_version: String,
    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
    /// Whether the connector is active.
    pub is_active: bool,
    /// Resolved validation endpoint URL.
    pub endpoint_url: String,
}

impl From<&ConnectorConfig> for ConnectorEcho {
    fn from(config: &ConnectorConfig) -> Self {
        Self {
            name: config.name.clone(),
            base_url: config.base_url.clone(),
            api_version: config.api_version.as_str().to_owned(),
            timeout_secs: config.timeout_secs,
            is_active: config.is_active,
            endpoint_url: config.endpoint_url(),
        }
    }
}

/// Builds a status report over all connectors in the registry.
#[must_use]
pub fn status_report(registry: &ConnectorRegistry) -> StatusReport {
    StatusReport {
        total_count: registry.len(),
        active_count: registry.active_count(),
        generated_at: Utc::now(),
        connectors: registry.iter().map(ConnectorEcho::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::config::ApiVersion;

    fn config(name: &str, is_active: bool) -> ConnectorConfig {
        ConnectorConfig {
            name: name.to_owned(),
            base_url: "http://localhost:8080/api/payments/".to_owned(),
            api_version: ApiVersion::V2,
            timeout_secs: 15,
            is_active,
        }
    }

    #[test]
    fn test_status_report_counts() {
        let registry =
            ConnectorRegistry::new(vec![config("a", true), config("b", false), config("c", true)]);

        let report = status_report(&registry);

        assert_eq!(report.total_count, 3);
        assert_eq!(report.active_count, 2);
        assert_eq!(report.connectors.len(), 3);
    }

    #[test]
    fn test_connector_echo_resolves_endpoint() {
        let echo = ConnectorEcho::from(&config("a", true));

        assert_eq!(echo.name, "a");
        assert_eq!(echo.api_version, "v2");
        assert_eq!(echo.timeout_secs, 15);
        assert_eq!(echo.endpoint_url, "http://localhost:8080/api/payments/v2/validate");
    }

    #[test]
    fn test_status_report_serializes_camel_case() {
        let registry = ConnectorRegistry::new(vec![config("a", true)]);
        let json = serde_json::to_value(status_report(&registry)).unwrap();

        assert_eq!(json["totalCount"], 1);
        assert_eq!(json["activeCount"], 1);
        assert!(json.get("generatedAt").is_some());
        assert_eq!(json["connectors"][0]["endpointUrl"], "http://localhost:8080/api/payments/v2/validate");
        assert_eq!(json["connectors"][0]["isActive"], true);
    }

    #[test]
    fn test_status_report_empty_registry() {
        let report = status_report(&ConnectorRegistry::default());
        assert_eq!(report.total_count, 0);
        assert_eq!(report.active_count, 0);
        assert!(report.connectors.is_empty());
    }
}
