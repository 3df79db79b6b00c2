pub mod security_event;
pub mod verification;

pub use security_event::{
    InMemorySecurityEventRepository, NoOpSecurityEventRepository, SecurityEventRepository,
};
pub use verification::{InMemoryVerificationRepository, VerificationRepository};
