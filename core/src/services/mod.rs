//! Business services containing domain logic and use cases.

pub mod audit;
pub mod cleanup;
pub mod rate_limit;
pub mod verification;

// Re-export commonly used types
pub use audit::{SecurityEventService, SecurityEventServiceConfig};
pub use cleanup::{CleanupConfig, CleanupStats, CleanupStatus, VerificationCleanupService};
pub use rate_limit::{InMemoryRateLimiter, RateLimitDecision, RateLimiterTrait};
pub use verification::{
    CodeSender, IssueOutcome, IssuedCode, SignupTokenIssuer, VerificationService,
    VerificationServiceConfig, VerifiedSignup, VerifyOutcome,
};
