use actix_web::{web, HttpResponse};

use sf_core::{CodeSender, SecurityEventRepository, VerificationRepository};

use crate::handlers::handle_domain_error;
use crate::routes::AppState;

/// Handler for POST /api/v1/admin/verification-cleanup
///
/// Runs the three purge passes immediately and returns the run statistics.
pub async fn run_cleanup<R, S, A>(state: web::Data<AppState<R, S, A>>) -> HttpResponse
where
    R: VerificationRepository + 'static,
    S: CodeSender + 'static,
    A: SecurityEventRepository + 'static,
{
    match state.cleanup_service.run_cleanup().await {
        Ok(stats) => {
            log::info!(
                "Manual verification cleanup removed {} record(s)",
                stats.total_cleaned
            );
            HttpResponse::Ok().json(stats)
        }
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for GET /api/v1/admin/verification-cleanup/status
pub async fn cleanup_status<R, S, A>(state: web::Data<AppState<R, S, A>>) -> HttpResponse
where
    R: VerificationRepository + 'static,
    S: CodeSender + 'static,
    A: SecurityEventRepository + 'static,
{
    match state.cleanup_service.status().await {
        Ok(status) => HttpResponse::Ok().json(status),
        Err(error) => handle_domain_error(error),
    }
}
