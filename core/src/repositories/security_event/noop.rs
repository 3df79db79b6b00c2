//! No-op implementation of SecurityEventRepository for wiring without storage

use async_trait::async_trait;

use super::SecurityEventRepository;
use crate::domain::entities::SecurityEvent;
use crate::errors::DomainError;

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSecurityEventRepository;

impl NoOpSecurityEventRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SecurityEventRepository for NoOpSecurityEventRepository {
    async fn create(&self, _event: &SecurityEvent) -> Result<(), DomainError> {
        Ok(())
    }

    async fn find_by_email(&self, _email: &str, _limit: usize) -> Result<Vec<SecurityEvent>, DomainError> {
        Ok(Vec::new())
    }
}
