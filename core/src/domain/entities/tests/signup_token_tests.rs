use chrono::{Duration, Utc};

use crate::domain::entities::signup_token::{SignupClaims, SIGNUP_TOKEN_AUDIENCE, SIGNUP_TOKEN_ISSUER};

#[test]
fn test_claims_window() {
    let now = Utc::now();
    let claims = SignupClaims::new("buyer@example.com", now, Duration::minutes(15));

    assert_eq!(claims.email(), "buyer@example.com");
    assert_eq!(claims.exp - claims.iat, 15 * 60);
    assert_eq!(claims.iss, SIGNUP_TOKEN_ISSUER);
    assert_eq!(claims.aud, SIGNUP_TOKEN_AUDIENCE);
}

#[test]
fn test_claims_have_unique_ids() {
    let now = Utc::now();
    let a = SignupClaims::new("buyer@example.com", now, Duration::minutes(15));
    let b = SignupClaims::new("buyer@example.com", now, Duration::minutes(15));
    assert_ne!(a.jti, b.jti);
}
