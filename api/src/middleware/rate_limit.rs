//! Rate limiting middleware for API endpoints
//!
//! Counts requests per client IP through a [`RateLimiterTrait`] so the budget
//! is shared by every server instance that talks to the same store.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use sf_core::{RateLimitDecision, RateLimiterTrait};
use sf_shared::config::EndpointLimit;
use sf_shared::errors::error_codes;

use crate::handlers::client_ip;
use crate::handlers::error::too_many_requests;

/// Rate limiter middleware factory
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<dyn RateLimiterTrait>,
    /// Key namespace, one per protected endpoint
    scope: &'static str,
    limit: EndpointLimit,
    enabled: bool,
}

impl RateLimit {
    pub fn new(limiter: Arc<dyn RateLimiterTrait>, scope: &'static str, limit: EndpointLimit) -> Self {
        Self {
            limiter,
            scope,
            limit,
            enabled: true,
        }
    }

    /// Toggle enforcement without changing the service type
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            config: self.clone(),
        }))
    }
}

/// Rate limiter middleware service
pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    config: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let config = self.config.clone();

        Box::pin(async move {
            if !config.enabled {
                return service.call(req).await.map(ServiceResponse::map_into_left_body);
            }

            let ip = client_ip(&req.connection_info());
            let key = format!("{}:{}", config.scope, ip);

            match config.limiter.check(&key, config.limit).await {
                Ok(RateLimitDecision::Limited { retry_after_seconds }) => {
                    log::warn!(
                        "Rate limit exceeded for {} on {} (retry after {}s)",
                        ip,
                        config.scope,
                        retry_after_seconds
                    );
                    let response = too_many_requests(
                        error_codes::RATE_LIMIT_EXCEEDED,
                        "Too many requests. Please slow down",
                        retry_after_seconds,
                    );
                    return Ok(req.into_response(response).map_into_right_body());
                }
                Ok(RateLimitDecision::Allowed { .. }) => {}
                // Fail open: the verification gate still enforces per-record lockout
                Err(e) => log::error!("Rate limiter unavailable for {}: {}", config.scope, e),
            }

            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}
