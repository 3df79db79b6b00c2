//! CORS middleware configuration for cross-origin requests.
//!
//! The storefront frontend calls the verification endpoints from the browser.
//! Development accepts any origin; staging and production accept only the
//! configured `ALLOWED_ORIGINS`.

use actix_cors::Cors;
use actix_web::http::{header, Method};

use sf_shared::Environment;

const MAX_AGE_SECONDS: usize = 3600;

/// Creates a CORS middleware instance configured for the environment.
pub fn create_cors(environment: Environment, allowed_origins: &[String]) -> Cors {
    if environment.is_development() {
        create_development_cors()
    } else {
        create_restricted_cors(allowed_origins)
    }
}

fn create_development_cors() -> Cors {
    log::info!("Configuring CORS for development environment");

    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::USER_AGENT,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers(vec![header::RETRY_AFTER])
        .max_age(MAX_AGE_SECONDS)
}

fn create_restricted_cors(allowed_origins: &[String]) -> Cors {
    log::info!("Configuring CORS for {} allowed origin(s)", allowed_origins.len());

    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .expose_headers(vec![header::RETRY_AFTER])
        .max_age(MAX_AGE_SECONDS);

    for origin in allowed_origins {
        if origin.starts_with("https://") {
            cors = cors.allowed_origin(origin);
        } else {
            log::warn!("Ignoring non-HTTPS CORS origin: {}", origin);
        }
    }

    cors
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    #[actix_web::test]
    async fn test_restricted_cors_rejects_unknown_origin() {
        let origins = vec!["https://shop.example.com".to_string()];
        let app = test::init_service(
            App::new()
                .wrap(create_cors(Environment::Production, &origins))
                .route("/", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let allowed = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "https://shop.example.com"))
            .to_request();
        let resp = test::call_service(&app, allowed).await;
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("https://shop.example.com")
        );

        let rejected = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "https://evil.example.com"))
            .to_request();
        let result = test::try_call_service(&app, rejected).await;
        let allow_origin = result
            .ok()
            .and_then(|resp| resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).cloned());
        assert!(allow_origin.is_none());
    }
}
