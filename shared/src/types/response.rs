//! API response types and wrappers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall health status
    pub status: HealthStatus,

    /// Service name
    pub service: String,

    /// Individual dependency checks
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub checks: HashMap<String, HealthStatus>,

    /// Server timestamp
    pub timestamp: DateTime<Utc>,

    /// Server version
    pub version: String,
}

impl HealthResponse {
    pub fn healthy(service: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Healthy,
            service: service.into(),
            checks: HashMap::new(),
            timestamp: Utc::now(),
            version: version.into(),
        }
    }

    /// Record a dependency check; the overall status is the worst one seen
    pub fn with_check(mut self, name: impl Into<String>, status: HealthStatus) -> Self {
        self.status = self.status.max(status);
        self.checks.insert(name.into(), status);
        self
    }

    pub fn is_unhealthy(&self) -> bool {
        self.status == HealthStatus::Unhealthy
    }
}

/// Ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_serializes_lowercase() {
        let json = serde_json::to_value(HealthStatus::Degraded).unwrap();
        assert_eq!(json, serde_json::json!("degraded"));
    }

    #[test]
    fn test_overall_status_is_worst_check() {
        let response = HealthResponse::healthy("svc", "1.0")
            .with_check("redis", HealthStatus::Degraded)
            .with_check("database", HealthStatus::Healthy);
        assert_eq!(response.status, HealthStatus::Degraded);
        assert!(!response.is_unhealthy());

        let response = response.with_check("database", HealthStatus::Unhealthy);
        assert!(response.is_unhealthy());
        assert_eq!(response.checks.len(), 2);
    }
}
