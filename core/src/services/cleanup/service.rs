//! Cleanup service for periodic maintenance of verification records
//!
//! Three independent delete passes run in order against the live store. A
//! record removed by an earlier pass is simply absent for later ones, so the
//! per-pass counts add up to the number of distinct records removed.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use sf_shared::VerificationConfig;

use crate::domain::entities::{SecurityEvent, SecurityEventKind};
use crate::errors::DomainResult;
use crate::repositories::{SecurityEventRepository, VerificationRepository};
use crate::services::audit::SecurityEventService;

/// Configuration for the cleanup service
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// Unverified records older than this many hours are stale
    pub stale_after_hours: i64,
    /// Unverified records with at least this many failures are abusive
    pub abuse_threshold: i32,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            stale_after_hours: 24,
            abuse_threshold: 15,
        }
    }
}

impl From<&VerificationConfig> for CleanupConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            stale_after_hours: config.stale_after_hours,
            abuse_threshold: config.abuse_threshold,
        }
    }
}

/// Result of a cleanup run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupStats {
    pub ran_at: DateTime<Utc>,
    /// Records past `expires_at`
    pub expired_deleted: u64,
    /// Unverified records older than the stale window
    pub stale_deleted: u64,
    /// Unverified records at or above the abuse threshold
    pub abusive_deleted: u64,
    pub total_cleaned: u64,
    pub records_before: u64,
    pub records_after: u64,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupStats {
    /// Check if the cleanup was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Candidate counts without deleting anything
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupStatus {
    pub checked_at: DateTime<Utc>,
    pub expired_candidates: u64,
    pub stale_candidates: u64,
    pub abusive_candidates: u64,
    pub total_records: u64,
}

/// Service for purging verification records that can no longer be used
pub struct VerificationCleanupService<R, A>
where
    R: VerificationRepository,
    A: SecurityEventRepository + 'static,
{
    repository: Arc<R>,
    events: Arc<SecurityEventService<A>>,
    config: CleanupConfig,
}

impl<R, A> VerificationCleanupService<R, A>
where
    R: VerificationRepository,
    A: SecurityEventRepository + 'static,
{
    pub fn new(repository: Arc<R>, events: Arc<SecurityEventService<A>>, config: CleanupConfig) -> Self {
        Self {
            repository,
            events,
            config,
        }
    }

    /// Run a single cleanup cycle
    ///
    /// # Returns
    /// * `Ok(CleanupStats)` - Summary of the passes; failed passes are listed in `errors`
    /// * `Err(DomainError)` - If the store could not be sized before the run
    pub async fn run_cleanup(&self) -> DomainResult<CleanupStats> {
        self.run_cleanup_at(Utc::now()).await
    }

    /// [`run_cleanup`](Self::run_cleanup) evaluated at `now`
    pub async fn run_cleanup_at(&self, now: DateTime<Utc>) -> DomainResult<CleanupStats> {
        info!("Starting verification cleanup cycle");

        let mut stats = CleanupStats {
            ran_at: now,
            records_before: self.repository.count_all().await?,
            ..CleanupStats::default()
        };

        match self.repository.delete_expired(now).await {
            Ok(count) => stats.expired_deleted = count,
            Err(e) => {
                error!("Failed to delete expired verification records: {}", e);
                stats.errors.push(format!("Expired pass error: {}", e));
            }
        }

        match self.repository.delete_stale_unverified(self.stale_cutoff(now)).await {
            Ok(count) => stats.stale_deleted = count,
            Err(e) => {
                error!("Failed to delete stale verification records: {}", e);
                stats.errors.push(format!("Stale pass error: {}", e));
            }
        }

        match self.repository.delete_abusive(self.config.abuse_threshold).await {
            Ok(count) => stats.abusive_deleted = count,
            Err(e) => {
                error!("Failed to delete abusive verification records: {}", e);
                stats.errors.push(format!("Abusive pass error: {}", e));
            }
        }

        stats.total_cleaned = stats.expired_deleted + stats.stale_deleted + stats.abusive_deleted;
        stats.records_after = match self.repository.count_all().await {
            Ok(count) => count,
            Err(e) => {
                stats.errors.push(format!("Record count error: {}", e));
                stats.records_before.saturating_sub(stats.total_cleaned)
            }
        };

        info!(
            event = "cleanup_run",
            "Verification cleanup completed - Expired: {}, Stale: {}, Abusive: {}, Remaining: {}",
            stats.expired_deleted,
            stats.stale_deleted,
            stats.abusive_deleted,
            stats.records_after
        );

        self.events
            .log_event(
                SecurityEvent::new(SecurityEventKind::CleanupRun)
                    .with_metadata("expired_deleted", stats.expired_deleted)
                    .with_metadata("stale_deleted", stats.stale_deleted)
                    .with_metadata("abusive_deleted", stats.abusive_deleted)
                    .with_metadata("total_cleaned", stats.total_cleaned)
                    .with_metadata("errors", stats.errors.len()),
            )
            .await;

        Ok(stats)
    }

    /// Count what a run would delete right now
    pub async fn status(&self) -> DomainResult<CleanupStatus> {
        self.status_at(Utc::now()).await
    }

    /// [`status`](Self::status) evaluated at `now`
    pub async fn status_at(&self, now: DateTime<Utc>) -> DomainResult<CleanupStatus> {
        Ok(CleanupStatus {
            checked_at: now,
            expired_candidates: self.repository.count_expired(now).await?,
            stale_candidates: self
                .repository
                .count_stale_unverified(self.stale_cutoff(now))
                .await?,
            abusive_candidates: self.repository.count_abusive(self.config.abuse_threshold).await?,
            total_records: self.repository.count_all().await?,
        })
    }

    fn stale_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::hours(self.config.stale_after_hours)
    }
}
