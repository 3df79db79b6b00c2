//! Rate limiting trait shared by the in-memory and Redis limiters

use async_trait::async_trait;

use sf_shared::config::EndpointLimit;

/// Verdict for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// Request admitted; `remaining` more fit in the current window
    Allowed { remaining: u32 },
    /// Budget exhausted until the window rolls over
    Limited { retry_after_seconds: u64 },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Fixed-window request counter
///
/// Every call counts against `key`. Implementations backed by a shared store
/// enforce the limit across server instances.
#[async_trait]
pub trait RateLimiterTrait: Send + Sync {
    /// Count one request for `key` and decide whether it may proceed
    async fn check(&self, key: &str, limit: EndpointLimit) -> Result<RateLimitDecision, String>;
}
