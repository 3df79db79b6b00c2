//! In-memory implementation of VerificationRepository for tests and local development.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::VerificationRecord;
use crate::errors::DomainError;

use super::VerificationRepository;

/// Records keyed by email; every mutation runs under a single write guard
#[derive(Clone, Default)]
pub struct InMemoryVerificationRepository {
    records: Arc<RwLock<HashMap<String, VerificationRecord>>>,
    should_fail: Arc<AtomicBool>,
}

impl InMemoryVerificationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with a database error
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Insert a record as-is, bypassing expiry checks
    pub async fn insert(&self, record: VerificationRecord) {
        self.records.write().await.insert(record.email.clone(), record);
    }

    /// Fetch the record for `email` regardless of expiry
    pub async fn get_by_email(&self, email: &str) -> Option<VerificationRecord> {
        self.records.read().await.get(email).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::Database("in-memory store unavailable".to_string()));
        }
        Ok(())
    }

    async fn delete_where<F>(&self, predicate: F) -> Result<u64, DomainError>
    where
        F: Fn(&VerificationRecord) -> bool + Send,
    {
        self.check_available()?;
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| !predicate(record));
        Ok((before - records.len()) as u64)
    }

    async fn count_where<F>(&self, predicate: F) -> Result<u64, DomainError>
    where
        F: Fn(&VerificationRecord) -> bool + Send,
    {
        self.check_available()?;
        let records = self.records.read().await;
        Ok(records.values().filter(|record| predicate(record)).count() as u64)
    }
}

#[async_trait]
impl VerificationRepository for InMemoryVerificationRepository {
    async fn find_active_by_email(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationRecord>, DomainError> {
        self.check_available()?;
        let records = self.records.read().await;
        Ok(records
            .get(email)
            .filter(|record| !record.is_expired_at(now))
            .cloned())
    }

    async fn replace_for_email(&self, record: &VerificationRecord) -> Result<(), DomainError> {
        self.check_available()?;
        self.records
            .write()
            .await
            .insert(record.email.clone(), record.clone());
        Ok(())
    }

    async fn record_failed_attempt(
        &self,
        id: Uuid,
        observed_failed_attempts: i32,
        now: DateTime<Utc>,
    ) -> Result<Option<i32>, DomainError> {
        self.check_available()?;
        let mut records = self.records.write().await;
        Ok(records
            .values_mut()
            .find(|record| record.id == id && record.failed_attempts == observed_failed_attempts)
            .map(|record| {
                record.register_failure(now);
                record.failed_attempts
            }))
    }

    async fn mark_verified(
        &self,
        id: Uuid,
        observed_failed_attempts: i32,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        self.check_available()?;
        let mut records = self.records.write().await;
        match records.values_mut().find(|record| {
            record.id == id && !record.verified && record.failed_attempts == observed_failed_attempts
        }) {
            Some(record) => {
                record.mark_verified(now);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        self.delete_where(|record| record.expires_at < now).await
    }

    async fn delete_stale_unverified(&self, created_before: DateTime<Utc>) -> Result<u64, DomainError> {
        self.delete_where(|record| record.is_stale(created_before)).await
    }

    async fn delete_abusive(&self, min_failed_attempts: i32) -> Result<u64, DomainError> {
        self.delete_where(|record| record.is_abusive(min_failed_attempts))
            .await
    }

    async fn count_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        self.count_where(|record| record.expires_at < now).await
    }

    async fn count_stale_unverified(&self, created_before: DateTime<Utc>) -> Result<u64, DomainError> {
        self.count_where(|record| record.is_stale(created_before)).await
    }

    async fn count_abusive(&self, min_failed_attempts: i32) -> Result<u64, DomainError> {
        self.count_where(|record| record.is_abusive(min_failed_attempts))
            .await
    }

    async fn count_all(&self) -> Result<u64, DomainError> {
        self.check_available()?;
        Ok(self.records.read().await.len() as u64)
    }
}
