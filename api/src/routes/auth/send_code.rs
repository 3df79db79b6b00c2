use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use validator::Validate;

use sf_core::{CodeSender, SecurityEventRepository, VerificationRepository};
use sf_shared::email::mask_email;

use crate::dto::SendCodeRequest;
use crate::handlers::{client_context, handle_domain_error, issue_outcome_response, validation_error_response};
use crate::routes::AppState;

/// Handler for POST /api/v1/auth/send-code
///
/// Issues a fresh code for the email and hands it to the delivery channel.
/// The code itself is never part of the response.
///
/// ## Errors
/// - 400 Bad Request: malformed email
/// - 429 Too Many Requests: resend cooldown still running (`Retry-After`)
/// - 500 Internal Server Error: storage or delivery failure
pub async fn send_code<R, S, A>(
    req: HttpRequest,
    state: web::Data<AppState<R, S, A>>,
    request: web::Json<SendCodeRequest>,
) -> HttpResponse
where
    R: VerificationRepository + 'static,
    S: CodeSender + 'static,
    A: SecurityEventRepository + 'static,
{
    if let Err(errors) = request.validate() {
        log::warn!("Rejected send_code request: {}", errors);
        return validation_error_response(&errors);
    }

    let context = client_context(&req);
    log::info!(
        "Processing send_code request for {} from {}",
        mask_email(&request.email),
        context.ip_address.as_deref().unwrap_or("unknown")
    );

    let now = Utc::now();
    match state
        .verification_service
        .issue_code_at(&request.email, request.name.as_deref(), &context, now)
        .await
    {
        Ok(outcome) => issue_outcome_response(outcome, now),
        Err(error) => handle_domain_error(error),
    }
}
