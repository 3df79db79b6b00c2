//! HTTP rendering of verification gate decisions

use actix_web::{http::StatusCode, HttpResponse};
use chrono::{DateTime, Utc};

use sf_core::{IssueOutcome, VerifyOutcome};
use sf_shared::errors::error_codes;
use sf_shared::ErrorResponse;

use super::error::{error_response, too_many_requests};
use crate::dto::{SendCodeResponse, VerifyCodeResponse};

/// Render a verification decision
pub fn verify_outcome_response(outcome: VerifyOutcome) -> HttpResponse {
    match outcome {
        VerifyOutcome::Success(signup) => HttpResponse::Ok().json(VerifyCodeResponse::from(signup)),
        VerifyOutcome::InvalidInput { field } => error_response(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(error_codes::VALIDATION_ERROR, format!("Missing required field: {}", field))
                .add_detail("field", field),
        ),
        VerifyOutcome::NotFoundOrExpired => error_response(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(
                error_codes::CODE_NOT_FOUND_OR_EXPIRED,
                "Verification code not found or expired. Please request a new code",
            ),
        ),
        VerifyOutcome::Locked => error_response(
            StatusCode::TOO_MANY_REQUESTS,
            ErrorResponse::new(
                error_codes::CODE_LOCKED,
                "Too many failed attempts. Please request a new code",
            ),
        ),
        VerifyOutcome::TooSoon { retry_after_seconds } => too_many_requests(
            error_codes::TOO_SOON,
            &format!("Please wait {} seconds before trying again", retry_after_seconds),
            retry_after_seconds,
        ),
        VerifyOutcome::Mismatch { attempts_remaining } => error_response(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(error_codes::CODE_MISMATCH, "Invalid verification code")
                .add_detail("attempts_remaining", attempts_remaining),
        ),
        VerifyOutcome::AlreadyUsed => error_response(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(
                error_codes::CODE_ALREADY_USED,
                "This verification code has already been used",
            ),
        ),
    }
}

/// Render a code request decision evaluated at `now`
pub fn issue_outcome_response(outcome: IssueOutcome, now: DateTime<Utc>) -> HttpResponse {
    match outcome {
        IssueOutcome::Issued(issued) => HttpResponse::Ok().json(SendCodeResponse {
            message: "Verification code sent".to_string(),
            expires_in: (issued.expires_at - now).num_seconds().max(0),
            resend_after: (issued.resend_available_at - now).num_seconds().max(0),
        }),
        IssueOutcome::InvalidInput { field } => error_response(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(error_codes::VALIDATION_ERROR, format!("Invalid {}", field))
                .add_detail("field", field),
        ),
        IssueOutcome::TooSoon { retry_after_seconds } => too_many_requests(
            error_codes::TOO_SOON,
            &format!("Please wait {} seconds before requesting another code", retry_after_seconds),
            retry_after_seconds,
        ),
    }
}
