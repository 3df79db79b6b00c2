//! MySQL repository implementations

mod security_event_repository_impl;
mod verification_repository_impl;

pub use security_event_repository_impl::MySqlSecurityEventRepository;
pub use verification_repository_impl::MySqlVerificationRepository;

use sf_core::DomainError;

/// Wrap a SQLx error with the operation that produced it
pub(crate) fn db_error(operation: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::Database(format!("Failed to {}: {}", operation, e))
}
