//! # Voltmart Core
//!
//! Core business logic and domain layer for the storefront signup flow.
//! This crate contains the verification record entity, repository interfaces,
//! the verification gate, the cleanup job, security event auditing and the
//! error types that the infrastructure and API layers build on.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    SecurityEvent, SecurityEventKind, SignupClaims, VerificationRecord, MAX_FAILED_ATTEMPTS,
};
pub use domain::value_objects::ClientContext;
pub use errors::{DomainError, DomainResult, TokenError};
pub use repositories::{
    InMemorySecurityEventRepository, InMemoryVerificationRepository, NoOpSecurityEventRepository,
    SecurityEventRepository, VerificationRepository,
};
pub use services::{
    CleanupConfig, CleanupStats, CleanupStatus, CodeSender, InMemoryRateLimiter, IssueOutcome,
    IssuedCode, RateLimitDecision, RateLimiterTrait, SecurityEventService,
    SecurityEventServiceConfig, SignupTokenIssuer, VerificationCleanupService,
    VerificationService, VerificationServiceConfig, VerifiedSignup, VerifyOutcome,
};
