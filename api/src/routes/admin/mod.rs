//! Back-office maintenance endpoints, guarded by the admin bearer key

pub mod cleanup;
