//! Shared utilities and common types for the Voltmart storefront server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Error and response structures
//! - Utility functions (email normalization and masking)

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AdminConfig, AppConfig, CacheConfig, ConfigError, DatabaseConfig, Environment,
    LoggingConfig, RateLimitConfig, ServerConfig, VerificationConfig,
};
pub use errors::ErrorResponse;
pub use types::{HealthResponse, HealthStatus};
pub use utils::email;
