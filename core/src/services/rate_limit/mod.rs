//! Request rate limiting keyed by client identity.

mod memory;
mod r#trait;

pub use memory::InMemoryRateLimiter;
pub use r#trait::{RateLimitDecision, RateLimiterTrait};
