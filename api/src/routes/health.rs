use actix_web::{web, HttpResponse};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use sf_core::{CodeSender, SecurityEventRepository, VerificationRepository};
use sf_infra::cache::RedisClient;
use sf_infra::database::DatabasePool;
use sf_shared::{HealthResponse, HealthStatus};

use crate::routes::AppState;

/// Longest a single dependency may take before it counts as down
const CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// A backing service reported by `/health`
#[async_trait]
pub trait DependencyCheck: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the API can serve requests without this dependency
    fn is_critical(&self) -> bool;

    async fn is_healthy(&self) -> bool;
}

#[async_trait]
impl DependencyCheck for DatabasePool {
    fn name(&self) -> &'static str {
        "database"
    }

    fn is_critical(&self) -> bool {
        true
    }

    async fn is_healthy(&self) -> bool {
        matches!(self.health_check().await, Ok(true))
    }
}

/// Rate limiting fails open, so losing Redis only degrades the service
#[async_trait]
impl DependencyCheck for RedisClient {
    fn name(&self) -> &'static str {
        "redis"
    }

    fn is_critical(&self) -> bool {
        false
    }

    async fn is_healthy(&self) -> bool {
        matches!(self.health_check().await, Ok(true))
    }
}

/// Health check endpoint handler
///
/// Answers 503 when a critical dependency is down.
pub async fn health_check<R, S, A>(state: web::Data<AppState<R, S, A>>) -> HttpResponse
where
    R: VerificationRepository,
    S: CodeSender,
    A: SecurityEventRepository + 'static,
{
    let mut response = HealthResponse::healthy("voltmart-storefront", env!("CARGO_PKG_VERSION"));
    for check in &state.dependency_checks {
        response = response.with_check(check.name(), run_check(check).await);
    }

    if response.is_unhealthy() {
        log::warn!("Health check failed: {:?}", response.checks);
        HttpResponse::ServiceUnavailable().json(response)
    } else {
        HttpResponse::Ok().json(response)
    }
}

async fn run_check(check: &Arc<dyn DependencyCheck>) -> HealthStatus {
    let healthy = tokio::time::timeout(CHECK_TIMEOUT, check.is_healthy())
        .await
        .unwrap_or(false);

    match (healthy, check.is_critical()) {
        (true, _) => HealthStatus::Healthy,
        (false, true) => HealthStatus::Unhealthy,
        (false, false) => HealthStatus::Degraded,
    }
}
