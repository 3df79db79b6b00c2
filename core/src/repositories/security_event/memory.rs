//! In-memory implementation of SecurityEventRepository.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::SecurityEventRepository;
use crate::domain::entities::{SecurityEvent, SecurityEventKind};
use crate::errors::DomainError;

#[derive(Clone, Default)]
pub struct InMemorySecurityEventRepository {
    events: Arc<RwLock<Vec<SecurityEvent>>>,
    should_fail: Arc<AtomicBool>,
}

impl InMemorySecurityEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether writes should fail
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// All stored events in insertion order
    pub async fn events(&self) -> Vec<SecurityEvent> {
        self.events.read().await.clone()
    }

    pub async fn events_of_kind(&self, kind: SecurityEventKind) -> Vec<SecurityEvent> {
        self.events
            .read()
            .await
            .iter()
            .filter(|event| event.kind == kind)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl SecurityEventRepository for InMemorySecurityEventRepository {
    async fn create(&self, event: &SecurityEvent) -> Result<(), DomainError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::Database("security event store unavailable".to_string()));
        }
        self.events.write().await.push(event.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str, limit: usize) -> Result<Vec<SecurityEvent>, DomainError> {
        let events = self.events.read().await;
        Ok(events
            .iter()
            .rev()
            .filter(|event| event.email.as_deref() == Some(email))
            .take(limit)
            .cloned()
            .collect())
    }
}
