pub mod auth;
pub mod cors;
pub mod rate_limit;
pub mod security;

pub use auth::AdminAuth;
pub use cors::create_cors;
pub use rate_limit::RateLimit;
pub use security::SecurityHeaders;
