//! Request metadata extraction

use actix_web::{dev::ConnectionInfo, http::header, HttpRequest};

use sf_core::ClientContext;

/// Best-effort client address
///
/// Honors `Forwarded`/`X-Forwarded-For`, so the server must sit behind a proxy
/// that overwrites those headers.
pub fn client_ip(info: &ConnectionInfo) -> String {
    info.realip_remote_addr().unwrap_or("unknown").to_string()
}

/// Caller metadata attached to security events
pub fn client_context(req: &HttpRequest) -> ClientContext {
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    ClientContext::new(Some(client_ip(&req.connection_info())), user_agent)
}
