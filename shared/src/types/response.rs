//! Health check response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall health status
    pub status: HealthStatus,

    /// Service name
    pub service: String,

    /// Server version
    pub version: String,

    /// Per-collaborator results, keyed by role (`mail`, `store`)
    pub checks: BTreeMap<String, ServiceHealth>,

    /// Server timestamp
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    /// Healthy response with no checks yet
    pub fn new(service: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Healthy,
            service: service.into(),
            version: version.into(),
            checks: BTreeMap::new(),
            timestamp: Utc::now(),
        }
    }

    /// Record a check; any unhealthy check makes the whole response unhealthy
    pub fn with_check(mut self, name: impl Into<String>, check: ServiceHealth) -> Self {
        if check.status == HealthStatus::Unhealthy {
            self.status = HealthStatus::Unhealthy;
        }
        self.checks.insert(name.into(), check);
        self
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

/// Health of a single collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: HealthStatus,

    /// Provider name, e.g. `smtp` or `firestore`
    pub provider: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
}

impl ServiceHealth {
    pub fn healthy(provider: impl Into<String>, response_time_ms: u64) -> Self {
        Self {
            status: HealthStatus::Healthy,
            provider: provider.into(),
            message: None,
            response_time_ms: Some(response_time_ms),
        }
    }

    pub fn unhealthy(provider: impl Into<String>, message: impl Into<String>, response_time_ms: u64) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            provider: provider.into(),
            message: Some(message.into()),
            response_time_ms: Some(response_time_ms),
        }
    }
}

/// Health status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}
