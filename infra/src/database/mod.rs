//! Database module - MySQL implementations using SQLx
//!
//! This module provides database access layer implementations including:
//! - Connection pool management and migrations
//! - Repository implementations for verification records and security events

pub mod connection;
pub mod mysql;

pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{MySqlSecurityEventRepository, MySqlVerificationRepository};
