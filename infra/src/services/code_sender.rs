//! Code delivery through the application log
//!
//! Stands in for a mail provider: the storefront has no outbound mail in this
//! deployment, so the code only reaches the log when explicitly revealed.

use async_trait::async_trait;
use uuid::Uuid;

use sf_core::CodeSender;
use sf_shared::utils::email::mask_email;

/// Writes verification codes to the tracing log
#[derive(Debug, Clone, Default)]
pub struct LoggingCodeSender {
    /// Log the plaintext code (development only)
    reveal_codes: bool,
}

impl LoggingCodeSender {
    pub fn new(reveal_codes: bool) -> Self {
        Self { reveal_codes }
    }
}

#[async_trait]
impl CodeSender for LoggingCodeSender {
    async fn send_code(&self, email: &str, code: &str, name: Option<&str>) -> Result<String, String> {
        let message_id = format!("log-{}", Uuid::new_v4());
        let masked = mask_email(email);

        tracing::info!(
            email = %masked,
            message_id = %message_id,
            has_name = name.is_some(),
            "Verification code dispatched"
        );
        if self.reveal_codes {
            tracing::debug!(email = %masked, code = %code, "Verification code (development)");
        }

        Ok(message_id)
    }
}
