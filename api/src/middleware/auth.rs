//! Bearer-key authentication for admin endpoints.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::{header::AUTHORIZATION, StatusCode},
    Error,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use sf_shared::errors::error_codes;
use sf_shared::ErrorResponse;

use crate::handlers::error::error_response;

/// Admin authentication middleware factory
///
/// Without a configured key every request is rejected.
#[derive(Clone)]
pub struct AdminAuth {
    api_key: Option<Arc<str>>,
}

impl AdminAuth {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.is_empty()).map(Arc::from),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthMiddleware {
            service: Rc::new(service),
            api_key: self.api_key.clone(),
        }))
    }
}

/// Admin authentication middleware service
pub struct AdminAuthMiddleware<S> {
    service: Rc<S>,
    api_key: Option<Arc<str>>,
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        let presented = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(extract_bearer_token)
            .map(str::to_string);
        let authorized = matches!(
            (&self.api_key, presented.as_deref()),
            (Some(expected), Some(token)) if keys_match(expected, token)
        );

        Box::pin(async move {
            if !authorized {
                log::warn!("Rejected admin request to {}", req.path());
                let response = error_response(
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new(error_codes::UNAUTHORIZED, "Invalid or missing admin key"),
                );
                return Ok(req.into_response(response).map_into_right_body());
            }

            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Token part of an `Authorization: Bearer <token>` header
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn keys_match(expected: &str, presented: &str) -> bool {
    constant_time_eq::constant_time_eq(expected.as_bytes(), presented.as_bytes())
}
