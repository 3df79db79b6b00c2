//! Domain entities representing core business objects.

pub mod security_event;
pub mod signup_token;
pub mod verification_record;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use security_event::{SecurityEvent, SecurityEventKind};
pub use signup_token::{SignupClaims, SIGNUP_TOKEN_AUDIENCE, SIGNUP_TOKEN_ISSUER};
pub use verification_record::{
    VerificationRecord, CODE_LENGTH, DEFAULT_EXPIRATION_MINUTES, MAX_FAILED_ATTEMPTS,
};
