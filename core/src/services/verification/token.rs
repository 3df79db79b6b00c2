//! HS256 signup token issued after a successful verification

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::entities::{SignupClaims, SIGNUP_TOKEN_AUDIENCE, SIGNUP_TOKEN_ISSUER};
use crate::errors::TokenError;

/// Signs and validates signup tokens
pub struct SignupTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl SignupTokenIssuer {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[SIGNUP_TOKEN_ISSUER]);
        validation.set_audience(&[SIGNUP_TOKEN_AUDIENCE]);
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Issue a token for `email` valid from `now`
    pub fn issue(&self, email: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = SignupClaims::new(email, now, self.ttl);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| TokenError::TokenGenerationFailed)
    }

    /// Validate a token and return its claims
    pub fn validate(&self, token: &str) -> Result<SignupClaims, TokenError> {
        decode::<SignupClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::from)
    }
}
