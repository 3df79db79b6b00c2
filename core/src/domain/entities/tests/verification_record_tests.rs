//! Unit tests for the verification record entity

use chrono::{Duration, TimeZone, Utc};

use crate::domain::entities::verification_record::{
    VerificationRecord, CODE_LENGTH, DEFAULT_EXPIRATION_MINUTES, MAX_FAILED_ATTEMPTS,
};

fn record_at(minutes_ttl: i64) -> VerificationRecord {
    let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    VerificationRecord::with_code(
        "buyer@example.com".to_string(),
        "123456".to_string(),
        Some("Ada".to_string()),
        created,
        created + Duration::minutes(minutes_ttl),
    )
}

#[test]
fn test_issue_sets_fresh_state() {
    let now = Utc::now();
    let record = VerificationRecord::issue(
        "buyer@example.com".to_string(),
        None,
        now,
        Duration::minutes(DEFAULT_EXPIRATION_MINUTES),
    );

    assert_eq!(record.email, "buyer@example.com");
    assert_eq!(record.code.len(), CODE_LENGTH);
    assert_eq!(record.failed_attempts, 0);
    assert!(!record.verified);
    assert!(record.verified_at.is_none());
    assert!(record.last_attempt_at.is_none());
    assert_eq!(record.expires_at - record.created_at, Duration::minutes(10));
}

#[test]
fn test_generate_code_format() {
    for _ in 0..200 {
        let code = VerificationRecord::generate_code();
        assert_eq!(code.len(), CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }
}

#[test]
fn test_code_uniqueness() {
    let codes: std::collections::HashSet<String> =
        (0..100).map(|_| VerificationRecord::generate_code()).collect();
    assert!(codes.len() > 1);
}

#[test]
fn test_expiry_boundary_is_exclusive() {
    let record = record_at(10);

    assert!(!record.is_expired_at(record.expires_at - Duration::seconds(1)));
    assert!(record.is_expired_at(record.expires_at));
    assert!(record.is_expired_at(record.expires_at + Duration::seconds(1)));
}

#[test]
fn test_matches_code() {
    let record = record_at(10);

    assert!(record.matches_code("123456"));
    assert!(!record.matches_code("123457"));
    assert!(!record.matches_code("12345"));
    assert!(!record.matches_code(""));
}

#[test]
fn test_register_failure_counts_and_stamps() {
    let mut record = record_at(10);
    let at = record.created_at + Duration::seconds(30);

    record.register_failure(at);

    assert_eq!(record.failed_attempts, 1);
    assert_eq!(record.last_attempt_at, Some(at));
    assert_eq!(record.attempts_remaining(), MAX_FAILED_ATTEMPTS - 1);
}

#[test]
fn test_lock_threshold() {
    let mut record = record_at(10);
    for i in 0..MAX_FAILED_ATTEMPTS {
        assert!(!record.is_locked());
        record.register_failure(record.created_at + Duration::seconds(i as i64));
    }

    assert!(record.is_locked());
    assert_eq!(record.attempts_remaining(), 0);
}

#[test]
fn test_mark_verified_resets_counter() {
    let mut record = record_at(10);
    record.register_failure(record.created_at);
    record.register_failure(record.created_at);
    let at = record.created_at + Duration::minutes(1);

    record.mark_verified(at);

    assert!(record.verified);
    assert_eq!(record.verified_at, Some(at));
    assert_eq!(record.failed_attempts, 0);
    assert_eq!(record.last_attempt_at, Some(at));
}

#[test]
fn test_elapsed_falls_back_to_created_at() {
    let mut record = record_at(10);
    let now = record.created_at + Duration::seconds(45);

    assert_eq!(record.elapsed_since_last_attempt(now), Duration::seconds(45));

    record.register_failure(record.created_at + Duration::seconds(40));
    assert_eq!(record.elapsed_since_last_attempt(now), Duration::seconds(5));
}

#[test]
fn test_stale_and_abusive_predicates() {
    let mut record = record_at(10);
    let cutoff = record.created_at + Duration::hours(1);

    assert!(record.is_stale(cutoff));
    assert!(!record.is_stale(record.created_at));

    record.failed_attempts = 15;
    assert!(record.is_abusive(15));
    assert!(!record.is_abusive(16));

    record.verified = true;
    assert!(!record.is_stale(cutoff));
    assert!(!record.is_abusive(15));
}
