//! Infrastructure adapters for core service traits

pub mod code_sender;
#[cfg(feature = "redis-cache")]
pub mod rate_limiter;

pub use code_sender::LoggingCodeSender;
#[cfg(feature = "redis-cache")]
pub use rate_limiter::RedisRateLimiter;

#[cfg(test)]
mod tests;
