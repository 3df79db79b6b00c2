//! Single-process rate limiter for tests and local development

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

use sf_shared::config::EndpointLimit;

use super::{RateLimitDecision, RateLimiterTrait};
use crate::services::verification::retry_after_seconds;

/// Minimum spacing between sweeps of elapsed windows
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    started: Instant,
    length: Duration,
}

impl Window {
    fn has_elapsed(&self, now: Instant) -> bool {
        now.duration_since(self.started) >= self.length
    }
}

#[derive(Debug, Default)]
struct WindowTable {
    windows: HashMap<String, Window>,
    last_sweep: Option<Instant>,
}

impl WindowTable {
    /// Drop windows that have run out, at most once per [`SWEEP_INTERVAL`]
    fn sweep(&mut self, now: Instant) {
        if self
            .last_sweep
            .is_some_and(|last| now.duration_since(last) < SWEEP_INTERVAL)
        {
            return;
        }
        self.windows.retain(|_, window| !window.has_elapsed(now));
        self.last_sweep = Some(now);
    }
}

/// Fixed windows held in process memory; limits are per instance
#[derive(Debug, Default)]
pub struct InMemoryRateLimiter {
    table: Mutex<WindowTable>,
}

impl InMemoryRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently holding a window
    pub fn tracked_keys(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .windows
            .len()
    }
}

#[async_trait]
impl RateLimiterTrait for InMemoryRateLimiter {
    async fn check(&self, key: &str, limit: EndpointLimit) -> Result<RateLimitDecision, String> {
        let now = Instant::now();
        let length = Duration::from_secs(limit.window_seconds);
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        table.sweep(now);

        let window = table.windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            started: now,
            length,
        });
        if window.has_elapsed(now) {
            *window = Window {
                count: 0,
                started: now,
                length,
            };
        }

        if window.count >= limit.max_requests {
            let wait = window.length.saturating_sub(now.duration_since(window.started));
            return Ok(RateLimitDecision::Limited {
                retry_after_seconds: retry_after_seconds(wait).max(1),
            });
        }

        window.count += 1;
        Ok(RateLimitDecision::Allowed {
            remaining: limit.max_requests - window.count,
        })
    }
}
