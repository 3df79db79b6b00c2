//! Configuration for the verification service

use sf_shared::VerificationConfig;

use crate::domain::entities::DEFAULT_EXPIRATION_MINUTES;

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Number of minutes before a verification code expires
    pub code_expiration_minutes: i64,
    /// Minimum seconds between code requests for one email
    pub resend_cooldown_seconds: i64,
    /// HS256 secret for signup tokens
    pub token_secret: String,
    /// Signup token lifetime in minutes
    pub token_ttl_minutes: i64,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            code_expiration_minutes: DEFAULT_EXPIRATION_MINUTES,
            resend_cooldown_seconds: 60,
            token_secret: "development-signup-secret-please-change".to_string(),
            token_ttl_minutes: 15,
        }
    }
}

impl From<&VerificationConfig> for VerificationServiceConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            code_expiration_minutes: config.code_ttl_minutes,
            resend_cooldown_seconds: config.resend_cooldown_seconds,
            token_secret: config.token_secret.clone(),
            token_ttl_minutes: config.token_ttl_minutes,
        }
    }
}
