//! Main verification service implementation

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use sf_shared::utils::email::{is_valid_email, mask_email, normalize_email};

use crate::domain::entities::{SignupClaims, VerificationRecord, MAX_FAILED_ATTEMPTS};
use crate::domain::value_objects::ClientContext;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{SecurityEventRepository, VerificationRepository};
use crate::services::audit::SecurityEventService;

use super::config::VerificationServiceConfig;
use super::delay_policy::{remaining_wait, retry_after_seconds};
use super::token::SignupTokenIssuer;
use super::traits::CodeSender;
use super::types::{IssueOutcome, IssuedCode, VerifiedSignup, VerifyOutcome};

/// Re-reads allowed when a conditional write finds the record changed
const STALE_SNAPSHOT_RETRIES: usize = 3;

/// Result of evaluating one snapshot of a record
enum Attempt {
    Decided(VerifyOutcome),
    /// The record changed after it was read; decide again on a fresh read
    Stale,
}

/// Verification service issuing and checking signup codes
pub struct VerificationService<R, S, A>
where
    R: VerificationRepository,
    S: CodeSender,
    A: SecurityEventRepository + 'static,
{
    /// Record storage
    repository: Arc<R>,
    /// Delivery channel for codes
    code_sender: Arc<S>,
    /// Security event sink
    events: Arc<SecurityEventService<A>>,
    token_issuer: SignupTokenIssuer,
    config: VerificationServiceConfig,
}

impl<R, S, A> VerificationService<R, S, A>
where
    R: VerificationRepository,
    S: CodeSender,
    A: SecurityEventRepository + 'static,
{
    /// Create a new verification service
    ///
    /// # Arguments
    ///
    /// * `repository` - Verification record storage
    /// * `code_sender` - Delivery channel for codes
    /// * `events` - Security event service
    /// * `config` - Service configuration
    pub fn new(
        repository: Arc<R>,
        code_sender: Arc<S>,
        events: Arc<SecurityEventService<A>>,
        config: VerificationServiceConfig,
    ) -> Self {
        let token_issuer = SignupTokenIssuer::new(&config.token_secret, config.token_ttl_minutes);

        Self {
            repository,
            code_sender,
            events,
            token_issuer,
            config,
        }
    }

    /// Issue a fresh code for `email`, superseding any previous one
    ///
    /// This method:
    /// 1. Validates the email shape
    /// 2. Enforces the resend cooldown against the live record
    /// 3. Hands a fresh code to the delivery channel
    /// 4. Replaces the record with the delivered code (counters reset)
    pub async fn issue_code(
        &self,
        email: &str,
        name: Option<&str>,
        context: &ClientContext,
    ) -> DomainResult<IssueOutcome> {
        self.issue_code_at(email, name, context, Utc::now()).await
    }

    /// [`issue_code`](Self::issue_code) evaluated at `now`
    pub async fn issue_code_at(
        &self,
        email: &str,
        name: Option<&str>,
        context: &ClientContext,
        now: DateTime<Utc>,
    ) -> DomainResult<IssueOutcome> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Ok(IssueOutcome::InvalidInput { field: "email" });
        }
        let masked = mask_email(&email);

        let cooldown = Duration::seconds(self.config.resend_cooldown_seconds);
        if let Some(existing) = self.repository.find_active_by_email(&email, now).await? {
            let resend_at = existing.created_at + cooldown;
            if resend_at > now {
                let wait = (resend_at - now).to_std().unwrap_or_default();
                tracing::warn!(
                    email = %masked,
                    event = "resend_cooldown",
                    "Verification code requested during resend cooldown"
                );
                return Ok(IssueOutcome::TooSoon {
                    retry_after_seconds: retry_after_seconds(wait),
                });
            }
        }

        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        let record = VerificationRecord::issue(
            email.clone(),
            name,
            now,
            Duration::minutes(self.config.code_expiration_minutes),
        );
        // A failed send must leave the previous code and its cooldown untouched
        let message_id = self
            .code_sender
            .send_code(&email, &record.code, record.name.as_deref())
            .await
            .map_err(|e| {
                tracing::error!(
                    email = %masked,
                    error = %e,
                    event = "code_delivery_failed",
                    "Failed to deliver verification code"
                );
                DomainError::internal(format!("Failed to send verification code: {}", e))
            })?;

        self.repository.replace_for_email(&record).await?;

        tracing::info!(
            email = %masked,
            event = "verification_code_issued",
            record_id = %record.id,
            "Issued new verification code"
        );

        self.events
            .log_code_issued(&email, record.expires_at.timestamp(), context)
            .await;

        Ok(IssueOutcome::Issued(IssuedCode {
            email,
            expires_at: record.expires_at,
            resend_available_at: now + cooldown,
            message_id,
        }))
    }

    /// Verify a code for `email`
    ///
    /// Checks run in order and the first decisive one wins: input presence,
    /// record lookup, lockout, progressive delay, then the constant-time
    /// comparison. At most one write lands per call, and only against the
    /// failure count the checks were run on.
    ///
    /// # Returns
    ///
    /// * `Ok(VerifyOutcome)` - The policy decision
    /// * `Err(DomainError)` - Storage or token signing failure
    pub async fn verify_code(
        &self,
        email: &str,
        code: &str,
        context: &ClientContext,
    ) -> DomainResult<VerifyOutcome> {
        self.verify_code_at(email, code, context, Utc::now()).await
    }

    /// [`verify_code`](Self::verify_code) evaluated at `now`
    pub async fn verify_code_at(
        &self,
        email: &str,
        code: &str,
        context: &ClientContext,
        now: DateTime<Utc>,
    ) -> DomainResult<VerifyOutcome> {
        let email = normalize_email(email);
        let code = code.trim();
        if email.is_empty() {
            return Ok(VerifyOutcome::InvalidInput { field: "email" });
        }
        if code.is_empty() {
            return Ok(VerifyOutcome::InvalidInput { field: "code" });
        }
        let masked = mask_email(&email);

        for _ in 0..=STALE_SNAPSHOT_RETRIES {
            let record = match self.repository.find_active_by_email(&email, now).await? {
                Some(record) => record,
                None => {
                    tracing::debug!(email = %masked, "No active verification record");
                    return Ok(VerifyOutcome::NotFoundOrExpired);
                }
            };

            match self.evaluate_attempt(&email, &masked, code, record, context, now).await? {
                Attempt::Decided(outcome) => return Ok(outcome),
                Attempt::Stale => {
                    tracing::debug!(email = %masked, "Verification record changed underneath attempt");
                }
            }
        }

        tracing::warn!(
            email = %masked,
            event = "verification_contended",
            "Verification record kept changing, asking client to retry"
        );
        Ok(VerifyOutcome::TooSoon {
            retry_after_seconds: 1,
        })
    }

    /// Run the lock, delay and comparison checks against one snapshot.
    ///
    /// The single write is conditioned on the snapshot's failure count, so a
    /// concurrent attempt that lands first turns this one into [`Attempt::Stale`].
    async fn evaluate_attempt(
        &self,
        email: &str,
        masked: &str,
        code: &str,
        record: VerificationRecord,
        context: &ClientContext,
        now: DateTime<Utc>,
    ) -> DomainResult<Attempt> {
        if record.is_locked() {
            tracing::warn!(
                email = %masked,
                failed_attempts = record.failed_attempts,
                event = "verification_locked",
                "Verification attempt against locked record"
            );
            self.events
                .log_verification_locked(email, record.failed_attempts, context)
                .await;
            return Ok(Attempt::Decided(VerifyOutcome::Locked));
        }

        if let Some(wait) = remaining_wait(record.failed_attempts, record.elapsed_since_last_attempt(now)) {
            let retry_after = retry_after_seconds(wait);
            tracing::info!(
                email = %masked,
                failed_attempts = record.failed_attempts,
                retry_after_seconds = retry_after,
                event = "verification_too_soon",
                "Verification attempt before progressive delay elapsed"
            );
            return Ok(Attempt::Decided(VerifyOutcome::TooSoon {
                retry_after_seconds: retry_after,
            }));
        }

        if !record.matches_code(code) {
            let Some(failed_attempts) = self
                .repository
                .record_failed_attempt(record.id, record.failed_attempts, now)
                .await?
            else {
                return Ok(Attempt::Stale);
            };
            let attempts_remaining = (MAX_FAILED_ATTEMPTS - failed_attempts).max(0);

            tracing::warn!(
                email = %masked,
                failed_attempts,
                attempts_remaining,
                event = "verification_failure",
                "Verification code mismatch"
            );
            self.events
                .log_verification_failure(email, failed_attempts, attempts_remaining, context)
                .await;

            return Ok(Attempt::Decided(VerifyOutcome::Mismatch { attempts_remaining }));
        }

        if record.verified {
            tracing::info!(
                email = %masked,
                event = "verification_already_used",
                "Verification code already consumed"
            );
            return Ok(Attempt::Decided(VerifyOutcome::AlreadyUsed));
        }

        if !self
            .repository
            .mark_verified(record.id, record.failed_attempts, now)
            .await?
        {
            return Ok(Attempt::Stale);
        }

        let signup_token = self.token_issuer.issue(email, now)?;

        tracing::info!(
            email = %masked,
            prior_failed_attempts = record.failed_attempts,
            event = "verification_success",
            "Verification code successfully verified"
        );
        self.events
            .log_verification_success(email, record.failed_attempts, context)
            .await;

        Ok(Attempt::Decided(VerifyOutcome::Success(VerifiedSignup {
            email: email.to_string(),
            name: record.name,
            signup_token,
        })))
    }

    /// Validate a signup token handed out by a successful verification
    pub fn validate_signup_token(&self, token: &str) -> DomainResult<SignupClaims> {
        Ok(self.token_issuer.validate(token)?)
    }
}
