//! Unit tests for the verification gate

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;

use crate::domain::entities::{SecurityEventKind, VerificationRecord, MAX_FAILED_ATTEMPTS};
use crate::domain::value_objects::ClientContext;
use crate::errors::DomainError;
use crate::services::verification::VerifyOutcome;

use super::mocks::{harness, Harness};

const EMAIL: &str = "buyer@example.com";
const CODE: &str = "482913";

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap()
}

fn ctx() -> ClientContext {
    ClientContext::new(Some("198.51.100.4".to_string()), Some("Mozilla/5.0".to_string()))
}

async fn seed(h: &Harness, at: DateTime<Utc>) -> VerificationRecord {
    let record = VerificationRecord::with_code(
        EMAIL.to_string(),
        CODE.to_string(),
        Some("Ada".to_string()),
        at - Duration::minutes(1),
        at + Duration::minutes(9),
    );
    h.repository.insert(record.clone()).await;
    record
}

async fn stored(h: &Harness) -> VerificationRecord {
    h.repository.get_by_email(EMAIL).await.unwrap()
}

#[tokio::test]
async fn test_empty_input_never_touches_store() {
    let h = harness();
    h.repository.set_should_fail(true);

    let outcome = h.service.verify_code_at("   ", CODE, &ctx(), now()).await.unwrap();
    assert_eq!(outcome, VerifyOutcome::InvalidInput { field: "email" });

    let outcome = h.service.verify_code_at(EMAIL, " ", &ctx(), now()).await.unwrap();
    assert_eq!(outcome, VerifyOutcome::InvalidInput { field: "code" });
}

#[tokio::test]
async fn test_unknown_email() {
    let h = harness();
    let outcome = h.service.verify_code_at(EMAIL, CODE, &ctx(), now()).await.unwrap();
    assert_eq!(outcome, VerifyOutcome::NotFoundOrExpired);
}

#[tokio::test]
async fn test_expired_record_is_never_matched() {
    let h = harness();
    let record = seed(&h, now()).await;

    let outcome = h
        .service
        .verify_code_at(EMAIL, CODE, &ctx(), record.expires_at)
        .await
        .unwrap();
    assert_eq!(outcome, VerifyOutcome::NotFoundOrExpired);
    assert!(!stored(&h).await.verified);
}

#[tokio::test]
async fn test_locked_even_with_correct_code() {
    let h = harness();
    let mut record = seed(&h, now()).await;
    record.failed_attempts = MAX_FAILED_ATTEMPTS;
    record.last_attempt_at = Some(now() - Duration::hours(1));
    h.repository.insert(record.clone()).await;

    let outcome = h.service.verify_code_at(EMAIL, CODE, &ctx(), now()).await.unwrap();

    assert_eq!(outcome, VerifyOutcome::Locked);
    assert_eq!(stored(&h).await, record);
    assert_eq!(h.events.events_of_kind(SecurityEventKind::VerificationLocked).await.len(), 1);
}

#[tokio::test]
async fn test_mismatch_counts_exactly_one() {
    let h = harness();
    seed(&h, now()).await;

    let outcome = h.service.verify_code_at(EMAIL, "000000", &ctx(), now()).await.unwrap();

    assert_eq!(outcome, VerifyOutcome::Mismatch { attempts_remaining: 9 });
    let record = stored(&h).await;
    assert_eq!(record.failed_attempts, 1);
    assert_eq!(record.last_attempt_at, Some(now()));
    assert!(!record.verified);

    let failures = h.events.events_of_kind(SecurityEventKind::VerificationFailure).await;
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].metadata_value("failed_attempts"), Some(&json!(1)));
    assert_eq!(failures[0].ip_address.as_deref(), Some("198.51.100.4"));
}

#[tokio::test]
async fn test_tenth_failure_locks_record() {
    let h = harness();
    let mut record = seed(&h, now()).await;
    record.failed_attempts = 9;
    record.last_attempt_at = Some(now() - Duration::minutes(16));
    h.repository.insert(record).await;

    let outcome = h.service.verify_code_at(EMAIL, "000000", &ctx(), now()).await.unwrap();
    assert_eq!(outcome, VerifyOutcome::Mismatch { attempts_remaining: 0 });

    let later = now() + Duration::hours(1);
    let mut refreshed = stored(&h).await;
    refreshed.expires_at = later + Duration::minutes(5);
    h.repository.insert(refreshed).await;

    let outcome = h.service.verify_code_at(EMAIL, CODE, &ctx(), later).await.unwrap();
    assert_eq!(outcome, VerifyOutcome::Locked);
}

#[tokio::test]
async fn test_correct_code_first_try() {
    let h = harness();
    seed(&h, now()).await;

    let outcome = h.service.verify_code_at(EMAIL, CODE, &ctx(), now()).await.unwrap();

    let VerifyOutcome::Success(signup) = outcome else {
        panic!("expected success, got {:?}", outcome);
    };
    assert_eq!(signup.email, EMAIL);
    assert_eq!(signup.name.as_deref(), Some("Ada"));

    let record = stored(&h).await;
    assert!(record.verified);
    assert_eq!(record.verified_at, Some(now()));
    assert_eq!(record.failed_attempts, 0);

    assert!(!signup.signup_token.is_empty());
    assert_eq!(h.events.events_of_kind(SecurityEventKind::VerificationSuccess).await.len(), 1);
}

#[tokio::test]
async fn test_second_correct_attempt_is_already_used() {
    let h = harness();
    seed(&h, now()).await;

    let first = h.service.verify_code_at(EMAIL, CODE, &ctx(), now()).await.unwrap();
    assert!(first.is_success());

    let second = h
        .service
        .verify_code_at(EMAIL, CODE, &ctx(), now() + Duration::seconds(5))
        .await
        .unwrap();
    assert_eq!(second, VerifyOutcome::AlreadyUsed);
    assert_eq!(stored(&h).await.verified_at, Some(now()));
}

#[tokio::test]
async fn test_progressive_delay_scenario() {
    let h = harness();
    seed(&h, now()).await;

    for offset in 0..3 {
        let at = now() + Duration::seconds(offset);
        let outcome = h.service.verify_code_at(EMAIL, "111111", &ctx(), at).await.unwrap();
        assert!(matches!(outcome, VerifyOutcome::Mismatch { .. }));
    }
    assert_eq!(stored(&h).await.failed_attempts, 3);

    // Last failure was at +2s; 30 s are owed from there
    let outcome = h
        .service
        .verify_code_at(EMAIL, CODE, &ctx(), now() + Duration::seconds(10))
        .await
        .unwrap();
    assert_eq!(outcome, VerifyOutcome::TooSoon { retry_after_seconds: 22 });
    let record = stored(&h).await;
    assert_eq!(record.failed_attempts, 3);
    assert_eq!(record.last_attempt_at, Some(now() + Duration::seconds(2)));

    let outcome = h
        .service
        .verify_code_at(EMAIL, CODE, &ctx(), now() + Duration::seconds(32))
        .await
        .unwrap();
    assert!(outcome.is_success());
    assert_eq!(stored(&h).await.failed_attempts, 0);

    let successes = h.events.events_of_kind(SecurityEventKind::VerificationSuccess).await;
    assert_eq!(successes[0].metadata_value("prior_failed_attempts"), Some(&json!(3)));
}

#[tokio::test]
async fn test_wrong_code_after_delay_is_counted() {
    let h = harness();
    let mut record = seed(&h, now()).await;
    record.failed_attempts = 5;
    record.last_attempt_at = Some(now() - Duration::seconds(61));
    h.repository.insert(record).await;

    let outcome = h.service.verify_code_at(EMAIL, "999999", &ctx(), now()).await.unwrap();
    assert_eq!(outcome, VerifyOutcome::Mismatch { attempts_remaining: 4 });
}

#[tokio::test]
async fn test_email_is_normalized() {
    let h = harness();
    seed(&h, now()).await;

    let outcome = h
        .service
        .verify_code_at("  Buyer@Example.COM ", CODE, &ctx(), now())
        .await
        .unwrap();
    assert!(outcome.is_success());
}

#[tokio::test]
async fn test_store_failure_is_an_error() {
    let h = harness();
    seed(&h, now()).await;
    h.repository.set_should_fail(true);

    let result = h.service.verify_code_at(EMAIL, CODE, &ctx(), now()).await;
    assert!(matches!(result, Err(DomainError::Database(_))));
}

#[tokio::test]
async fn test_event_sink_failure_does_not_change_outcome() {
    let h = harness();
    seed(&h, now()).await;
    h.events.set_should_fail(true);

    let outcome = h.service.verify_code_at(EMAIL, "000000", &ctx(), now()).await.unwrap();
    assert_eq!(outcome, VerifyOutcome::Mismatch { attempts_remaining: 9 });
}

#[tokio::test]
async fn test_signup_token_validates() {
    let h = harness();
    let at = Utc::now();
    seed(&h, at).await;

    let VerifyOutcome::Success(signup) = h.service.verify_code_at(EMAIL, CODE, &ctx(), at).await.unwrap() else {
        panic!("expected success");
    };

    let claims = h.service.validate_signup_token(&signup.signup_token).unwrap();
    assert_eq!(claims.email(), EMAIL);
}
