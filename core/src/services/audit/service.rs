//! Security event service for recording verification attempts and maintenance runs.
//!
//! Writes are fire-and-forget: a failing sink is logged and never changes the
//! outcome of the operation that produced the event.

use std::sync::Arc;
use tokio::task;

use sf_shared::utils::email::mask_email;

use crate::domain::entities::{SecurityEvent, SecurityEventKind};
use crate::domain::value_objects::ClientContext;
use crate::errors::DomainResult;
use crate::repositories::SecurityEventRepository;

/// Configuration for the security event service
#[derive(Debug, Clone)]
pub struct SecurityEventServiceConfig {
    /// Whether to run writes in a background task
    pub async_writes: bool,
}

impl Default for SecurityEventServiceConfig {
    fn default() -> Self {
        Self { async_writes: true }
    }
}

/// Service for writing security events to the configured sink
pub struct SecurityEventService<R>
where
    R: SecurityEventRepository,
{
    repository: Arc<R>,
    config: SecurityEventServiceConfig,
}

impl<R> SecurityEventService<R>
where
    R: SecurityEventRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: SecurityEventServiceConfig) -> Self {
        Self { repository, config }
    }

    /// Record a mismatch with the post-increment failure count
    pub async fn log_verification_failure(
        &self,
        email: &str,
        failed_attempts: i32,
        attempts_remaining: i32,
        context: &ClientContext,
    ) {
        let event = Self::event_for(SecurityEventKind::VerificationFailure, email, context)
            .with_metadata("failed_attempts", failed_attempts)
            .with_metadata("attempts_remaining", attempts_remaining);
        self.log_event(event).await;
    }

    /// Record a successful verification and how many failures preceded it
    pub async fn log_verification_success(
        &self,
        email: &str,
        prior_failed_attempts: i32,
        context: &ClientContext,
    ) {
        let event = Self::event_for(SecurityEventKind::VerificationSuccess, email, context)
            .with_metadata("prior_failed_attempts", prior_failed_attempts);
        self.log_event(event).await;
    }

    /// Record an attempt against a locked record
    pub async fn log_verification_locked(
        &self,
        email: &str,
        failed_attempts: i32,
        context: &ClientContext,
    ) {
        let event = Self::event_for(SecurityEventKind::VerificationLocked, email, context)
            .with_metadata("failed_attempts", failed_attempts);
        self.log_event(event).await;
    }

    /// Record that a fresh code was issued
    pub async fn log_code_issued(&self, email: &str, expires_at_unix: i64, context: &ClientContext) {
        let event = Self::event_for(SecurityEventKind::VerificationCodeIssued, email, context)
            .with_metadata("expires_at", expires_at_unix);
        self.log_event(event).await;
    }

    /// Write an arbitrary event
    pub async fn log_event(&self, event: SecurityEvent) {
        if self.config.async_writes {
            let repository = Arc::clone(&self.repository);

            task::spawn(async move {
                if let Err(e) = repository.create(&event).await {
                    tracing::warn!(
                        event = event.kind.as_str(),
                        error = %e,
                        "Failed to write security event"
                    );
                }
            });
        } else if let Err(e) = self.repository.create(&event).await {
            tracing::warn!(
                event = event.kind.as_str(),
                error = %e,
                "Failed to write security event"
            );
        }
    }

    /// Get recent events for an email address, newest first
    pub async fn events_for_email(&self, email: &str, limit: usize) -> DomainResult<Vec<SecurityEvent>> {
        self.repository.find_by_email(email, limit).await
    }

    fn event_for(kind: SecurityEventKind, email: &str, context: &ClientContext) -> SecurityEvent {
        tracing::debug!(event = kind.as_str(), email = %mask_email(email), "Recording security event");
        SecurityEvent::new(kind)
            .with_email(email)
            .with_request_context(context.ip_address.clone(), context.user_agent.clone())
    }
}
