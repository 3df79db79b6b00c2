//! Request and response bodies for the HTTP API

pub mod admin;
pub mod verification;

pub use verification::{SendCodeRequest, SendCodeResponse, VerifyCodeRequest, VerifyCodeResponse};
