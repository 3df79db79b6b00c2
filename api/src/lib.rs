//! HTTP API for the Voltmart signup verification gate
//!
//! Exposed as a library so integration tests can build the app with
//! in-memory adapters.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use app::create_app;
pub use routes::AppState;
