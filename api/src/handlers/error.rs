//! Mapping from domain and request errors to HTTP responses

use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::{header, StatusCode},
    HttpRequest, HttpResponse,
};
use validator::ValidationErrors;

use sf_core::DomainError;
use sf_shared::errors::error_codes;
use sf_shared::ErrorResponse;

/// Serialize an error body with the given status
pub fn error_response(status: StatusCode, body: ErrorResponse) -> HttpResponse {
    HttpResponse::build(status).json(body)
}

/// 429 with a `Retry-After` header and matching `retry_after` detail
pub fn too_many_requests(error: &str, message: &str, retry_after_seconds: u64) -> HttpResponse {
    HttpResponse::TooManyRequests()
        .insert_header((header::RETRY_AFTER, retry_after_seconds.to_string()))
        .json(ErrorResponse::new(error, message).add_detail("retry_after", retry_after_seconds))
}

/// Handle domain errors and convert them to appropriate HTTP responses
///
/// Policy decisions travel as outcomes, so anything reaching here is a
/// storage or signing failure: logged in full and answered with an opaque 500.
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    log::error!("Request failed: {}", error);
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred"),
    )
}

/// 400 listing the offending fields
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let fields: Vec<&str> = errors.field_errors().keys().copied().collect();
    error_response(
        StatusCode::BAD_REQUEST,
        ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request data").add_detail("fields", fields),
    )
}

/// JSON extractor errors answered with the standard error body
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "Request body too large".to_string()
        }
        other => format!("Malformed request body: {}", other),
    };
    let response = error_response(
        StatusCode::BAD_REQUEST,
        ErrorResponse::new(error_codes::VALIDATION_ERROR, message),
    );
    InternalError::from_response(err, response).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_core::TokenError;

    #[test]
    fn test_storage_failure_is_opaque_500() {
        let response = handle_domain_error(DomainError::Database("connection refused".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_token_failure_is_opaque_500() {
        let response = handle_domain_error(DomainError::Token(TokenError::TokenGenerationFailed));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_too_many_requests_sets_retry_after() {
        let response = too_many_requests(error_codes::TOO_SOON, "Slow down", 30);
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).and_then(|v| v.to_str().ok()),
            Some("30")
        );
    }
}
