//! Signup verification endpoints

pub mod send_code;
pub mod verify_code;
