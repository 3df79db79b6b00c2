//! Cache module - Redis client used for shared counters

pub mod redis_client;

pub use redis_client::RedisClient;

#[cfg(test)]
mod tests;
