//! Back-office configuration

use serde::{Deserialize, Serialize};

/// Settings for the admin maintenance endpoints
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AdminConfig {
    /// Shared bearer secret for admin endpoints. `None` disables them.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Run verification cleanup on this interval. `None` leaves it to callers.
    #[serde(default)]
    pub cleanup_interval_seconds: Option<u64>,
}

impl AdminConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("ADMIN_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            cleanup_interval_seconds: std::env::var("CLEANUP_INTERVAL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0),
        }
    }
}
