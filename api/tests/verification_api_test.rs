mod common;

use actix_web::{http::header, http::StatusCode, test};
use serde_json::{json, Value};

use sf_api::create_app;
use sf_core::{SecurityEventKind, VerificationRecord};
use sf_shared::config::EndpointLimit;

use common::{context, context_with_config, stored_code, test_config};

const EMAIL: &str = "buyer@example.com";

#[actix_web::test]
async fn test_send_then_verify_returns_signup_token() {
    let ctx = context();
    let app = test::init_service(create_app(ctx.state.clone(), ctx.limiter.clone(), &ctx.config)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/send-code")
        .set_json(json!({ "email": EMAIL, "name": "Ada" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body.get("code").is_none());
    assert_eq!(body["resend_after"], json!(60));
    assert!(body["expires_in"].as_i64().unwrap() > 590);

    let code = stored_code(&ctx, EMAIL).await;
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/verify-code")
        .set_json(json!({ "email": EMAIL, "code": code }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], json!(EMAIL));
    assert_eq!(body["name"], json!("Ada"));
    assert!(!body["signup_token"].as_str().unwrap().is_empty());

    let record = ctx.repository.get_by_email(EMAIL).await.unwrap();
    assert!(record.verified);
    assert_eq!(record.failed_attempts, 0);
    assert_eq!(ctx.events.events_of_kind(SecurityEventKind::VerificationSuccess).await.len(), 1);
}

#[actix_web::test]
async fn test_send_code_rejects_malformed_email() {
    let ctx = context();
    let app = test::init_service(create_app(ctx.state.clone(), ctx.limiter.clone(), &ctx.config)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/send-code")
        .set_json(json!({ "email": "not-an-email" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("validation_error"));
    assert!(ctx.repository.is_empty().await);
}

#[actix_web::test]
async fn test_resend_during_cooldown_is_429() {
    let ctx = context();
    let app = test::init_service(create_app(ctx.state.clone(), ctx.limiter.clone(), &ctx.config)).await;

    for expected in [StatusCode::OK, StatusCode::TOO_MANY_REQUESTS] {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/send-code")
            .set_json(json!({ "email": EMAIL }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);

        if expected == StatusCode::TOO_MANY_REQUESTS {
            assert!(resp.headers().contains_key(header::RETRY_AFTER));
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], json!("too_soon"));
        }
    }
}

#[actix_web::test]
async fn test_wrong_code_reports_attempts_remaining() {
    let ctx = context();
    let app = test::init_service(create_app(ctx.state.clone(), ctx.limiter.clone(), &ctx.config)).await;
    let now = chrono::Utc::now();
    ctx.repository
        .insert(VerificationRecord::with_code(
            EMAIL.to_string(),
            "123456".to_string(),
            None,
            now,
            now + chrono::Duration::minutes(10),
        ))
        .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/verify-code")
        .set_json(json!({ "email": EMAIL, "code": "000000" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("invalid_code"));
    assert_eq!(body["details"]["attempts_remaining"], json!(9));
}

#[actix_web::test]
async fn test_fourth_rapid_attempt_is_too_soon() {
    let ctx = context();
    let app = test::init_service(create_app(ctx.state.clone(), ctx.limiter.clone(), &ctx.config)).await;
    let now = chrono::Utc::now();
    ctx.repository
        .insert(VerificationRecord::with_code(
            EMAIL.to_string(),
            "123456".to_string(),
            None,
            now,
            now + chrono::Duration::minutes(10),
        ))
        .await;

    for _ in 0..3 {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/verify-code")
            .set_json(json!({ "email": EMAIL, "code": "000000" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    // Even the correct code waits for the delay
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/verify-code")
        .set_json(json!({ "email": EMAIL, "code": "123456" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = resp
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap();
    assert!(retry_after > 0 && retry_after <= 30);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("too_soon"));
    assert_eq!(ctx.repository.get_by_email(EMAIL).await.unwrap().failed_attempts, 3);
}

#[actix_web::test]
async fn test_locked_record_is_429() {
    let ctx = context();
    let app = test::init_service(create_app(ctx.state.clone(), ctx.limiter.clone(), &ctx.config)).await;
    let now = chrono::Utc::now();
    let mut record = VerificationRecord::with_code(
        EMAIL.to_string(),
        "123456".to_string(),
        None,
        now,
        now + chrono::Duration::minutes(10),
    );
    record.failed_attempts = 10;
    record.last_attempt_at = Some(now - chrono::Duration::hours(1));
    ctx.repository.insert(record).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/verify-code")
        .set_json(json!({ "email": EMAIL, "code": "123456" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("verification_locked"));
}

#[actix_web::test]
async fn test_unknown_email_and_reused_code() {
    let ctx = context();
    let app = test::init_service(create_app(ctx.state.clone(), ctx.limiter.clone(), &ctx.config)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/verify-code")
        .set_json(json!({ "email": EMAIL, "code": "123456" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("code_not_found_or_expired"));

    let now = chrono::Utc::now();
    ctx.repository
        .insert(VerificationRecord::with_code(
            EMAIL.to_string(),
            "123456".to_string(),
            None,
            now,
            now + chrono::Duration::minutes(10),
        ))
        .await;

    let mut statuses = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/verify-code")
            .set_json(json!({ "email": EMAIL, "code": "123456" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        statuses.push(resp.status());
        if resp.status() == StatusCode::BAD_REQUEST {
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], json!("code_already_used"));
        }
    }
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::BAD_REQUEST]);
}

#[actix_web::test]
async fn test_blank_code_and_malformed_body_are_400() {
    let ctx = context();
    let app = test::init_service(create_app(ctx.state.clone(), ctx.limiter.clone(), &ctx.config)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/verify-code")
        .set_json(json!({ "email": EMAIL, "code": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["details"]["field"], json!("code"));

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/verify-code")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"email\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("validation_error"));
}

#[actix_web::test]
async fn test_per_ip_rate_limit() {
    let mut config = test_config();
    config.rate_limit.verify_code_per_ip = EndpointLimit::new(2, 60);
    let ctx = context_with_config(config);
    let app = test::init_service(create_app(ctx.state.clone(), ctx.limiter.clone(), &ctx.config)).await;

    let mut last = None;
    for _ in 0..3 {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/verify-code")
            .peer_addr("198.51.100.4:40000".parse().unwrap())
            .set_json(json!({ "email": EMAIL, "code": "123456" }))
            .to_request();
        last = Some(test::call_service(&app, req).await);
    }
    let resp = last.unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key(header::RETRY_AFTER));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("rate_limit_exceeded"));

    // Another client keeps its own budget
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/verify-code")
        .peer_addr("198.51.100.5:40000".parse().unwrap())
        .set_json(json!({ "email": EMAIL, "code": "123456" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_rate_limit_can_be_disabled() {
    let mut config = test_config();
    config.rate_limit.enabled = false;
    config.rate_limit.verify_code_per_ip = EndpointLimit::new(1, 60);
    let ctx = context_with_config(config);
    let app = test::init_service(create_app(ctx.state.clone(), ctx.limiter.clone(), &ctx.config)).await;

    for _ in 0..3 {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/verify-code")
            .set_json(json!({ "email": EMAIL, "code": "123456" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
