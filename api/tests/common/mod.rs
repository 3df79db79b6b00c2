#![allow(dead_code)]

use actix_web::web;
use std::sync::Arc;

use sf_api::routes::health::DependencyCheck;
use sf_api::AppState;
use sf_core::{
    CleanupConfig, InMemoryRateLimiter, InMemorySecurityEventRepository, InMemoryVerificationRepository,
    RateLimiterTrait, SecurityEventService, SecurityEventServiceConfig, VerificationCleanupService,
    VerificationService, VerificationServiceConfig,
};
use sf_infra::services::LoggingCodeSender;
use sf_shared::AppConfig;

pub const ADMIN_KEY: &str = "test-admin-key";

pub type TestState = AppState<InMemoryVerificationRepository, LoggingCodeSender, InMemorySecurityEventRepository>;

/// Fully wired state backed by in-memory adapters
pub struct TestContext {
    pub state: web::Data<TestState>,
    pub limiter: Arc<dyn RateLimiterTrait>,
    pub repository: Arc<InMemoryVerificationRepository>,
    pub events: Arc<InMemorySecurityEventRepository>,
    pub config: AppConfig,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.admin.api_key = Some(ADMIN_KEY.to_string());
    config.logging.access_log = false;
    config
}

pub fn context() -> TestContext {
    context_with_config(test_config())
}

pub fn context_with_config(config: AppConfig) -> TestContext {
    context_with_dependencies(config, Vec::new())
}

pub fn context_with_dependencies(
    config: AppConfig,
    dependency_checks: Vec<Arc<dyn DependencyCheck>>,
) -> TestContext {
    let repository = Arc::new(InMemoryVerificationRepository::new());
    let events = Arc::new(InMemorySecurityEventRepository::new());
    let event_service = Arc::new(SecurityEventService::new(
        events.clone(),
        SecurityEventServiceConfig { async_writes: false },
    ));

    let verification_service = Arc::new(VerificationService::new(
        repository.clone(),
        Arc::new(LoggingCodeSender::new(false)),
        event_service.clone(),
        VerificationServiceConfig::from(&config.verification),
    ));
    let cleanup_service = Arc::new(VerificationCleanupService::new(
        repository.clone(),
        event_service,
        CleanupConfig::from(&config.verification),
    ));

    TestContext {
        state: web::Data::new(AppState {
            verification_service,
            cleanup_service,
            dependency_checks,
        }),
        limiter: Arc::new(InMemoryRateLimiter::new()),
        repository,
        events,
        config,
    }
}

/// Code currently stored for `email`
pub async fn stored_code(context: &TestContext, email: &str) -> String {
    context
        .repository
        .get_by_email(email)
        .await
        .map(|record| record.code)
        .expect("no verification record stored")
}
