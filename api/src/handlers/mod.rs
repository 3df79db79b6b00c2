pub mod error;
pub mod outcome;
pub mod request;

pub use error::{handle_domain_error, json_error_handler, validation_error_response};
pub use outcome::{issue_outcome_response, verify_outcome_response};
pub use request::{client_context, client_ip};
