//! HTTP route handlers and the state they share

pub mod admin;
pub mod auth;
pub mod health;

use std::sync::Arc;

use sf_core::{
    CodeSender, SecurityEventRepository, VerificationCleanupService, VerificationRepository,
    VerificationService,
};

use self::health::DependencyCheck;

/// Application state that holds shared services
pub struct AppState<R, S, A>
where
    R: VerificationRepository,
    S: CodeSender,
    A: SecurityEventRepository + 'static,
{
    pub verification_service: Arc<VerificationService<R, S, A>>,
    pub cleanup_service: Arc<VerificationCleanupService<R, A>>,
    /// Backing services reported by `/health`
    pub dependency_checks: Vec<Arc<dyn DependencyCheck>>,
}
