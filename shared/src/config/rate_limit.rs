//! Rate limiting configuration for the verification endpoints

use serde::{Deserialize, Serialize};

/// A request budget for one endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct EndpointLimit {
    /// Requests allowed per window
    pub max_requests: u32,
    /// Window length in seconds
    pub window_seconds: u64,
}

impl EndpointLimit {
    pub const fn new(max_requests: u32, window_seconds: u64) -> Self {
        Self {
            max_requests,
            window_seconds,
        }
    }
}

/// Per-IP limits enforced by the API rate limiting middleware
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Whether rate limiting is enforced at all
    pub enabled: bool,

    /// POST /auth/verify-code per IP
    pub verify_code_per_ip: EndpointLimit,

    /// POST /auth/send-code per IP
    pub send_code_per_ip: EndpointLimit,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            verify_code_per_ip: EndpointLimit::new(30, 60),
            send_code_per_ip: EndpointLimit::new(5, 600),
        }
    }
}

impl RateLimitConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(enabled) = std::env::var("RATE_LIMIT_ENABLED") {
            config.enabled = enabled != "false" && enabled != "0";
        }
        if let Some(max) = std::env::var("RATE_LIMIT_VERIFY_PER_MINUTE")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.verify_code_per_ip = EndpointLimit::new(max, 60);
        }
        config
    }
}
