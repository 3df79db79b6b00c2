//! Claims carried by the signup token handed out after a successful verification.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT issuer
pub const SIGNUP_TOKEN_ISSUER: &str = "voltmart-storefront";

/// JWT audience; the token is only good for the signup step
pub const SIGNUP_TOKEN_AUDIENCE: &str = "signup";

/// Claims structure for the signup token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupClaims {
    /// Subject (verified email address)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl SignupClaims {
    /// Creates claims for `email` issued at `now`
    pub fn new(email: &str, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: email.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            iss: SIGNUP_TOKEN_ISSUER.to_string(),
            aud: SIGNUP_TOKEN_AUDIENCE.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// The verified email address
    pub fn email(&self) -> &str {
        &self.sub
    }
}
