//! Signup verification configuration

use serde::{Deserialize, Serialize};

const DEFAULT_TOKEN_SECRET: &str = "change-me-signup-token-secret";

/// Settings for the pre-signup email verification gate
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Minutes a freshly issued code stays valid
    pub code_ttl_minutes: i64,

    /// Minimum seconds between two code requests for the same email
    pub resend_cooldown_seconds: i64,

    /// Secret used to sign the signup token handed out on success
    pub token_secret: String,

    /// Minutes the signup token stays valid
    pub token_ttl_minutes: i64,

    /// Unverified records older than this are purged by cleanup
    #[serde(default = "default_stale_after_hours")]
    pub stale_after_hours: i64,

    /// Unverified records with at least this many failures are purged by cleanup
    #[serde(default = "default_abuse_threshold")]
    pub abuse_threshold: i32,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_ttl_minutes: 10,
            resend_cooldown_seconds: 60,
            token_secret: String::from(DEFAULT_TOKEN_SECRET),
            token_ttl_minutes: 15,
            stale_after_hours: default_stale_after_hours(),
            abuse_threshold: default_abuse_threshold(),
        }
    }
}

impl VerificationConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            code_ttl_minutes: env_parse("VERIFICATION_CODE_TTL_MINUTES", defaults.code_ttl_minutes),
            resend_cooldown_seconds: env_parse(
                "VERIFICATION_RESEND_COOLDOWN_SECONDS",
                defaults.resend_cooldown_seconds,
            ),
            token_secret: std::env::var("SIGNUP_TOKEN_SECRET").unwrap_or(defaults.token_secret),
            token_ttl_minutes: env_parse("SIGNUP_TOKEN_TTL_MINUTES", defaults.token_ttl_minutes),
            stale_after_hours: env_parse("VERIFICATION_STALE_AFTER_HOURS", defaults.stale_after_hours),
            abuse_threshold: env_parse("VERIFICATION_ABUSE_THRESHOLD", defaults.abuse_threshold),
        }
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.token_secret == DEFAULT_TOKEN_SECRET
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn default_stale_after_hours() -> i64 {
    24
}

fn default_abuse_threshold() -> i32 {
    15
}
