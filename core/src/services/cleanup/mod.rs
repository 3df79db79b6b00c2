//! Verification record cleanup: expired, stale and abusive records.

mod service;

pub use service::{CleanupConfig, CleanupStats, CleanupStatus, VerificationCleanupService};
