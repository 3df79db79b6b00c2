//! Value objects representing immutable domain concepts.

pub mod client_context;

// Re-export commonly used types
pub use client_context::ClientContext;
