//! Traits for code delivery integration

use async_trait::async_trait;

/// Delivery channel for verification codes (mail provider, log sink, ...)
#[async_trait]
pub trait CodeSender: Send + Sync {
    /// Send a verification code to an email address
    ///
    /// # Returns
    /// * `Ok(message_id)` - Provider reference for the sent message
    /// * `Err(reason)` - Delivery failed
    async fn send_code(&self, email: &str, code: &str, name: Option<&str>) -> Result<String, String>;
}
