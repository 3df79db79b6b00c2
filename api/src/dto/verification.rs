use serde::{Deserialize, Serialize};
use validator::Validate;

use sf_core::VerifiedSignup;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendCodeRequest {
    #[validate(length(min = 3, max = 254))]
    pub email: String,
    #[validate(length(max = 100))]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyCodeRequest {
    #[validate(length(max = 254))]
    pub email: String,
    #[validate(length(max = 16))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendCodeResponse {
    pub message: String,
    /// Seconds until the code expires
    pub expires_in: i64,
    /// Seconds until another code may be requested
    pub resend_after: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyCodeResponse {
    pub email: String,
    pub name: Option<String>,
    /// Bearer for the signup step, valid for a few minutes
    pub signup_token: String,
}

impl From<VerifiedSignup> for VerifyCodeResponse {
    fn from(signup: VerifiedSignup) -> Self {
        Self {
            email: signup.email,
            name: signup.name,
            signup_token: signup.signup_token,
        }
    }
}
