use sf_core::CodeSender;

use crate::services::LoggingCodeSender;

#[tokio::test]
async fn test_logging_sender_returns_message_id() {
    let sender = LoggingCodeSender::new(false);

    let first = sender.send_code("buyer@example.com", "123456", Some("Ada")).await.unwrap();
    let second = sender.send_code("buyer@example.com", "654321", None).await.unwrap();

    assert!(first.starts_with("log-"));
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_logging_sender_with_revealed_codes() {
    let sender = LoggingCodeSender::new(true);

    let message_id = sender.send_code("buyer@example.com", "123456", None).await.unwrap();
    assert!(message_id.starts_with("log-"));
}
