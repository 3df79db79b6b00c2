//! Request metadata attached to security events.

use serde::{Deserialize, Serialize};

/// Client address and agent as seen by the HTTP layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl ClientContext {
    pub fn new(ip_address: Option<String>, user_agent: Option<String>) -> Self {
        Self {
            ip_address,
            user_agent,
        }
    }

    /// Context for work that did not originate from a request (scheduled jobs, tests)
    pub fn internal() -> Self {
        Self::default()
    }
}
