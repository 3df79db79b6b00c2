//! Verification repository trait defining the interface for record persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::VerificationRecord;
use crate::errors::DomainError;

/// Repository trait for VerificationRecord persistence operations
///
/// Mutations address a record by `id` so that an update racing with a newer
/// code request never touches the replacement. Attempt mutations also carry
/// the `failed_attempts` value the caller decided on and only apply while the
/// stored counter still equals it. Implementations must apply each mutation
/// atomically in the store; callers hold no locks.
#[async_trait]
pub trait VerificationRepository: Send + Sync {
    /// Find the record for `email` whose `expires_at` is strictly after `now`
    async fn find_active_by_email(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationRecord>, DomainError>;

    /// Store `record`, removing any previous record for the same email
    async fn replace_for_email(&self, record: &VerificationRecord) -> Result<(), DomainError>;

    /// Atomically add one failure and stamp `last_attempt_at`
    ///
    /// # Returns
    /// * `Some(count)` with the post-increment counter
    /// * `None` if the record is gone or its counter moved past `observed_failed_attempts`
    async fn record_failed_attempt(
        &self,
        id: Uuid,
        observed_failed_attempts: i32,
        now: DateTime<Utc>,
    ) -> Result<Option<i32>, DomainError>;

    /// Conditionally flip `verified` from false to true and reset the counter
    ///
    /// # Returns
    /// * `true` if this call performed the transition
    /// * `false` if the record is gone, already verified, or its counter
    ///   moved past `observed_failed_attempts`
    async fn mark_verified(
        &self,
        id: Uuid,
        observed_failed_attempts: i32,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Delete records with `expires_at < now`
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;

    /// Delete unverified records created before `created_before`
    async fn delete_stale_unverified(&self, created_before: DateTime<Utc>) -> Result<u64, DomainError>;

    /// Delete unverified records with at least `min_failed_attempts` failures
    async fn delete_abusive(&self, min_failed_attempts: i32) -> Result<u64, DomainError>;

    async fn count_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;

    async fn count_stale_unverified(&self, created_before: DateTime<Utc>) -> Result<u64, DomainError>;

    async fn count_abusive(&self, min_failed_attempts: i32) -> Result<u64, DomainError>;

    /// Total number of stored records
    async fn count_all(&self) -> Result<u64, DomainError>;
}
