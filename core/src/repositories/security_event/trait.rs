//! Security event repository trait defining the interface for audit persistence.

use async_trait::async_trait;

use crate::domain::entities::SecurityEvent;
use crate::errors::DomainError;

/// Repository trait for SecurityEvent persistence operations
///
/// Writes are append-only. Implementations should be cheap enough to call from
/// a spawned task without holding up the request that produced the event.
#[async_trait]
pub trait SecurityEventRepository: Send + Sync {
    /// Persist a new event
    async fn create(&self, event: &SecurityEvent) -> Result<(), DomainError>;

    /// Find events concerning `email`, newest first
    ///
    /// # Arguments
    /// * `email` - Normalized email address
    /// * `limit` - Maximum number of events to return
    async fn find_by_email(&self, email: &str, limit: usize) -> Result<Vec<SecurityEvent>, DomainError>;
}
