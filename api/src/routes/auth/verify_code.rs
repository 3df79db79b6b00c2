use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use sf_core::{CodeSender, SecurityEventRepository, VerificationRepository};

use crate::dto::VerifyCodeRequest;
use crate::handlers::{client_context, handle_domain_error, validation_error_response, verify_outcome_response};
use crate::routes::AppState;

/// Handler for POST /api/v1/auth/verify-code
///
/// # Request Body
///
/// ```json
/// { "email": "buyer@example.com", "code": "123456" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "email": "buyer@example.com", "name": "Ada", "signup_token": "eyJhbGciOiJIUzI1NiIs..." }
/// ```
///
/// ## Errors
/// - 400 Bad Request: missing input, unknown/expired code, wrong code
///   (`attempts_remaining`), code already used
/// - 429 Too Many Requests: locked record, or progressive delay running
///   (`Retry-After`)
/// - 500 Internal Server Error: storage or token signing failure
pub async fn verify_code<R, S, A>(
    req: HttpRequest,
    state: web::Data<AppState<R, S, A>>,
    request: web::Json<VerifyCodeRequest>,
) -> HttpResponse
where
    R: VerificationRepository + 'static,
    S: CodeSender + 'static,
    A: SecurityEventRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    let context = client_context(&req);
    match state
        .verification_service
        .verify_code(&request.email, &request.code, &context)
        .await
    {
        Ok(outcome) => {
            log::debug!("verify_code outcome: {}", outcome.as_str());
            verify_outcome_response(outcome)
        }
        Err(error) => handle_domain_error(error),
    }
}
