//! Security event repository module.

mod r#trait;
pub use r#trait::SecurityEventRepository;

mod memory;
pub use memory::InMemorySecurityEventRepository;

mod noop;
pub use noop::NoOpSecurityEventRepository;

#[cfg(test)]
mod tests;
