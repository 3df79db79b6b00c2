//! Types for verification service results

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of a verification attempt.
///
/// Every policy decision is a variant; only storage faults are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// A required field was empty
    InvalidInput { field: &'static str },
    /// No unexpired record for the email
    NotFoundOrExpired,
    /// The record reached the failure limit
    Locked,
    /// The progressive delay has not elapsed; the attempt was not counted
    TooSoon { retry_after_seconds: u64 },
    /// Wrong code
    Mismatch { attempts_remaining: i32 },
    /// Right code, but it was already consumed
    AlreadyUsed,
    Success(VerifiedSignup),
}

impl VerifyOutcome {
    /// Stable machine-readable name, used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::NotFoundOrExpired => "not_found_or_expired",
            Self::Locked => "locked",
            Self::TooSoon { .. } => "too_soon",
            Self::Mismatch { .. } => "mismatch",
            Self::AlreadyUsed => "already_used",
            Self::Success(_) => "success",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Data handed to the signup step after a successful verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifiedSignup {
    pub email: String,
    pub name: Option<String>,
    /// Signed token proving the email was verified
    pub signup_token: String,
}

/// Outcome of a code request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueOutcome {
    /// The email is empty or malformed
    InvalidInput { field: &'static str },
    /// A code was issued too recently
    TooSoon { retry_after_seconds: u64 },
    Issued(IssuedCode),
}

/// Result of sending a verification code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCode {
    pub email: String,
    /// When the code stops being accepted
    pub expires_at: DateTime<Utc>,
    /// When the user can request another code
    pub resend_available_at: DateTime<Utc>,
    /// Provider reference for the sent message
    pub message_id: String,
}
