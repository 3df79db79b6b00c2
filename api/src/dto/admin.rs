//! Admin maintenance responses reuse the core report types directly.

pub use sf_core::{CleanupStats, CleanupStatus};
