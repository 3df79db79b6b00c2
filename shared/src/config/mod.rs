//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `admin` - Back-office credentials and maintenance scheduling
//! - `cache` - Redis configuration
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `rate_limit` - Per-IP request limits for the verification endpoints
//! - `server` - HTTP server configuration
//! - `verification` - Signup code lifetime, cooldown and token settings

pub mod admin;
pub mod cache;
pub mod database;
pub mod environment;
pub mod rate_limit;
pub mod server;
pub mod verification;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use admin::AdminConfig;
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LoggingConfig};
pub use rate_limit::{EndpointLimit, RateLimitConfig};
pub use server::ServerConfig;
pub use verification::VerificationConfig;

/// Errors raised while validating a loaded configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Missing required configuration: {key}")]
    Missing { key: String },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Redis configuration
    pub cache: CacheConfig,

    /// Verification gate configuration
    pub verification: VerificationConfig,

    /// Admin endpoints configuration
    #[serde(default)]
    pub admin: AdminConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
            verification: VerificationConfig::default(),
            admin: AdminConfig::default(),
            rate_limit: RateLimitConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory is read first when present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            cache: CacheConfig::from_env(),
            verification: VerificationConfig::from_env(),
            admin: AdminConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Reject configurations that are unsafe to serve with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.verification.code_ttl_minutes <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "VERIFICATION_CODE_TTL_MINUTES".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        if self.environment.is_production() {
            if self.verification.is_using_default_secret() {
                return Err(ConfigError::InvalidValue {
                    key: "SIGNUP_TOKEN_SECRET".to_string(),
                    reason: "default secret is not allowed in production".to_string(),
                });
            }
            if self.admin.api_key.is_none() {
                return Err(ConfigError::Missing {
                    key: "ADMIN_API_KEY".to_string(),
                });
            }
        }

        Ok(())
    }
}
