//! # Infrastructure Layer
//!
//! Concrete adapters for the Voltmart verification gate:
//! - **Database**: MySQL repositories using SQLx, plus migrations
//! - **Cache**: Redis client used for shared rate limiting
//! - **Services**: Redis rate limiter and the logging code sender
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)
//! - `redis-cache`: Enable Redis support (default)

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Cache module - Redis client and operations
#[cfg(feature = "redis-cache")]
pub mod cache;

/// Services module - Infrastructure service implementations
pub mod services;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
