//! Application state and factory
//!
//! Builds the Actix-web application from already wired services so the same
//! factory serves the binary (MySQL/Redis) and the tests (in-memory adapters).

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::{Condition, Logger},
    web, App, Error, HttpResponse,
};
use std::sync::Arc;

use sf_core::{CodeSender, RateLimiterTrait, SecurityEventRepository, VerificationRepository};
use sf_shared::errors::error_codes;
use sf_shared::{AppConfig, ErrorResponse};

use crate::handlers::json_error_handler;
use crate::middleware::{create_cors, AdminAuth, RateLimit, SecurityHeaders};
use crate::routes::admin::cleanup::{cleanup_status, run_cleanup};
use crate::routes::auth::{send_code::send_code, verify_code::verify_code};
use crate::routes::health::health_check;
use crate::routes::AppState;

/// Create and configure the application with all dependencies
pub fn create_app<R, S, A>(
    app_state: web::Data<AppState<R, S, A>>,
    rate_limiter: Arc<dyn RateLimiterTrait>,
    config: &AppConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    R: VerificationRepository + 'static,
    S: CodeSender + 'static,
    A: SecurityEventRepository + 'static,
{
    let limits = &config.rate_limit;
    let send_code_limit = RateLimit::new(rate_limiter.clone(), "send_code", limits.send_code_per_ip)
        .enabled(limits.enabled);
    let verify_code_limit = RateLimit::new(rate_limiter, "verify_code", limits.verify_code_per_ip)
        .enabled(limits.enabled);

    let json_config = web::JsonConfig::default()
        .limit(config.server.max_payload_size)
        .error_handler(json_error_handler);

    App::new()
        .app_data(app_state)
        .app_data(json_config)
        // Middleware order matters: the last one registered runs first
        .wrap(SecurityHeaders::for_environment(config.environment))
        .wrap(create_cors(config.environment, &config.server.allowed_origins))
        .wrap(Condition::new(config.logging.access_log, Logger::default()))
        .route("/health", web::get().to(health_check::<R, S, A>))
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/auth")
                        .service(
                            web::resource("/send-code")
                                .wrap(send_code_limit)
                                .route(web::post().to(send_code::<R, S, A>)),
                        )
                        .service(
                            web::resource("/verify-code")
                                .wrap(verify_code_limit)
                                .route(web::post().to(verify_code::<R, S, A>)),
                        ),
                )
                .service(
                    web::scope("/admin")
                        .wrap(AdminAuth::new(config.admin.api_key.clone()))
                        .route("/verification-cleanup", web::post().to(run_cleanup::<R, S, A>))
                        .route(
                            "/verification-cleanup/status",
                            web::get().to(cleanup_status::<R, S, A>),
                        ),
                ),
        )
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
