//! Redis-based rate limiter shared across server instances

use async_trait::async_trait;
use std::sync::Arc;

use sf_core::{RateLimitDecision, RateLimiterTrait};
use sf_shared::config::EndpointLimit;

use crate::cache::redis_client::RedisClient;

/// Redis-based implementation of the rate limiter trait
///
/// Uses a fixed window per key: `INCR` on every request, `EXPIRE` on the first.
pub struct RedisRateLimiter {
    redis_client: Arc<RedisClient>,
}

impl RedisRateLimiter {
    /// Create a new Redis-based rate limiter
    pub fn new(redis_client: Arc<RedisClient>) -> Self {
        Self { redis_client }
    }
}

#[async_trait]
impl RateLimiterTrait for RedisRateLimiter {
    async fn check(&self, key: &str, limit: EndpointLimit) -> Result<RateLimitDecision, String> {
        let key = self.redis_client.key(&format!("rate_limit:{}", key));

        let (count, ttl) = self
            .redis_client
            .increment_in_window(&key, limit.window_seconds)
            .await
            .map_err(|e| format!("Failed to check rate limit: {}", e))?;

        let decision = decide(count, ttl, limit);
        if !decision.is_allowed() {
            tracing::warn!(
                key = %key,
                count,
                max_requests = limit.max_requests,
                event = "rate_limit_exceeded",
                "Rate limit exceeded"
            );
        }

        Ok(decision)
    }
}

/// Map a window counter onto a decision
pub(crate) fn decide(count: i64, ttl_seconds: i64, limit: EndpointLimit) -> RateLimitDecision {
    let max = i64::from(limit.max_requests);
    if count > max {
        RateLimitDecision::Limited {
            retry_after_seconds: ttl_seconds.max(1) as u64,
        }
    } else {
        RateLimitDecision::Allowed {
            remaining: (max - count).max(0) as u32,
        }
    }
}
