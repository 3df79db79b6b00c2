//! Verification record entity for pre-signup email verification.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Failed attempts after which a record rejects every further attempt
pub const MAX_FAILED_ATTEMPTS: i32 = 10;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Default expiration time for verification codes (10 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 10;

/// Per-email state of a pending or completed signup code challenge.
///
/// The logical key is `email`; `id` only addresses the row so that updates
/// never touch a record that replaced this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Storage identifier
    pub id: Uuid,

    /// Normalized email address the code was sent to
    pub email: String,

    /// The 6-digit verification code
    pub code: String,

    /// Display name captured with the code request
    pub name: Option<String>,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,

    /// Instant after which the record can no longer be matched
    pub expires_at: DateTime<Utc>,

    /// Whether the code has been successfully verified
    pub verified: bool,

    /// When the code was verified
    pub verified_at: Option<DateTime<Utc>>,

    /// Mismatches since creation or since the last success
    pub failed_attempts: i32,

    /// Time of the most recent attempt that changed the counter
    pub last_attempt_at: Option<DateTime<Utc>>,
}

impl VerificationRecord {
    /// Creates a record with a fresh random code
    ///
    /// # Arguments
    ///
    /// * `email` - Normalized email address
    /// * `name` - Optional display name echoed back on success
    /// * `now` - Creation instant
    /// * `ttl` - Lifetime of the code
    pub fn issue(email: String, name: Option<String>, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self::with_code(email, Self::generate_code(), name, now, now + ttl)
    }

    /// Creates a record with a known code
    pub fn with_code(
        email: String,
        code: String,
        name: Option<String>,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            code,
            name,
            created_at,
            expires_at,
            verified: false,
            verified_at: None,
            failed_attempts: 0,
            last_attempt_at: None,
        }
    }

    /// Generates a uniformly distributed 6-digit code from the OS CSPRNG
    pub fn generate_code() -> String {
        let code: u32 = OsRng.gen_range(0..1_000_000);
        format!("{:06}", code)
    }

    /// A record is matchable only while `expires_at` is strictly in the future
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Whether the record has reached the lockout threshold
    pub fn is_locked(&self) -> bool {
        self.failed_attempts >= MAX_FAILED_ATTEMPTS
    }

    /// Attempts left before lockout (0 if locked)
    pub fn attempts_remaining(&self) -> i32 {
        (MAX_FAILED_ATTEMPTS - self.failed_attempts).max(0)
    }

    /// Time elapsed since the last counted attempt.
    ///
    /// Falls back to the creation time for records that never saw an attempt.
    pub fn elapsed_since_last_attempt(&self, now: DateTime<Utc>) -> Duration {
        now - self.last_attempt_at.unwrap_or(self.created_at)
    }

    /// Compares the provided code in constant time
    pub fn matches_code(&self, input_code: &str) -> bool {
        constant_time_eq(self.code.as_bytes(), input_code.as_bytes())
    }

    /// Unverified and created before `cutoff`
    pub fn is_stale(&self, cutoff: DateTime<Utc>) -> bool {
        !self.verified && self.created_at < cutoff
    }

    /// Unverified with at least `threshold` failures
    pub fn is_abusive(&self, threshold: i32) -> bool {
        !self.verified && self.failed_attempts >= threshold
    }

    /// Applies a mismatch: one more failure, stamped at `now`
    pub fn register_failure(&mut self, now: DateTime<Utc>) {
        self.failed_attempts += 1;
        self.last_attempt_at = Some(now);
    }

    /// Applies the one-time success transition
    pub fn mark_verified(&mut self, now: DateTime<Utc>) {
        self.verified = true;
        self.verified_at = Some(now);
        self.failed_attempts = 0;
        self.last_attempt_at = Some(now);
    }
}
