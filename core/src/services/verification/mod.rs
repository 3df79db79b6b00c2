//! Verification gate for pre-signup email codes
//!
//! This module provides the complete code workflow:
//! - Code issuance with resend cooldown and supersede semantics
//! - Code verification with progressive delay and lockout
//! - Signup token issuance on success
//! - Security events for every decisive outcome

mod config;
pub mod delay_policy;
mod service;
mod token;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use config::VerificationServiceConfig;
pub use delay_policy::{required_delay, retry_after_seconds, DELAY_FREE_ATTEMPTS};
pub use service::VerificationService;
pub use token::SignupTokenIssuer;
pub use traits::CodeSender;
pub use types::{IssueOutcome, IssuedCode, VerifiedSignup, VerifyOutcome};
