use chrono::{Duration, Utc};

use crate::errors::TokenError;
use crate::services::verification::SignupTokenIssuer;

#[test]
fn test_issue_and_validate() {
    let issuer = SignupTokenIssuer::new("secret-a", 15);
    let token = issuer.issue("buyer@example.com", Utc::now()).unwrap();

    let claims = issuer.validate(&token).unwrap();
    assert_eq!(claims.email(), "buyer@example.com");
    assert_eq!(claims.exp - claims.iat, 15 * 60);
}

#[test]
fn test_rejects_foreign_secret() {
    let token = SignupTokenIssuer::new("secret-a", 15)
        .issue("buyer@example.com", Utc::now())
        .unwrap();

    let result = SignupTokenIssuer::new("secret-b", 15).validate(&token);
    assert_eq!(result, Err(TokenError::InvalidSignature));
}

#[test]
fn test_rejects_expired_token() {
    let issuer = SignupTokenIssuer::new("secret-a", 15);
    let token = issuer
        .issue("buyer@example.com", Utc::now() - Duration::hours(2))
        .unwrap();

    assert_eq!(issuer.validate(&token), Err(TokenError::TokenExpired));
}

#[test]
fn test_rejects_garbage() {
    let issuer = SignupTokenIssuer::new("secret-a", 15);
    assert!(issuer.validate("not.a.token").is_err());
}
