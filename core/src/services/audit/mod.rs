//! Security event service recording verification outcomes and maintenance runs.

mod service;

pub use service::{SecurityEventService, SecurityEventServiceConfig};
