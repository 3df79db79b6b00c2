use crate::domain::entities::{SecurityEvent, SecurityEventKind};
use crate::errors::DomainError;
use crate::repositories::security_event::{
    InMemorySecurityEventRepository, NoOpSecurityEventRepository, SecurityEventRepository,
};

#[tokio::test]
async fn test_find_by_email_newest_first_with_limit() {
    let repo = InMemorySecurityEventRepository::new();
    for attempt in 1..=3 {
        let event = SecurityEvent::new(SecurityEventKind::VerificationFailure)
            .with_email("a@example.com")
            .with_metadata("failed_attempts", attempt);
        repo.create(&event).await.unwrap();
    }
    repo.create(&SecurityEvent::new(SecurityEventKind::CleanupRun))
        .await
        .unwrap();

    let found = repo.find_by_email("a@example.com", 2).await.unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].metadata_value("failed_attempts"), Some(&serde_json::json!(3)));
    assert_eq!(found[1].metadata_value("failed_attempts"), Some(&serde_json::json!(2)));

    assert_eq!(repo.events_of_kind(SecurityEventKind::CleanupRun).await.len(), 1);
}

#[tokio::test]
async fn test_failing_writes() {
    let repo = InMemorySecurityEventRepository::new();
    repo.set_should_fail(true);

    let result = repo
        .create(&SecurityEvent::new(SecurityEventKind::VerificationSuccess))
        .await;
    assert!(matches!(result, Err(DomainError::Database(_))));
    assert!(repo.events().await.is_empty());
}

#[tokio::test]
async fn test_noop_discards() {
    let repo = NoOpSecurityEventRepository::new();
    let event = SecurityEvent::new(SecurityEventKind::VerificationLocked).with_email("a@example.com");

    repo.create(&event).await.unwrap();
    assert!(repo.find_by_email("a@example.com", 10).await.unwrap().is_empty());
}
