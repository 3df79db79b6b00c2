//! Progressive delay between verification attempts.
//!
//! | failed attempts | required wait |
//! |-----------------|---------------|
//! | 0..=2           | none          |
//! | 3..=4           | 30 s          |
//! | 5..=6           | 60 s          |
//! | 7..=8           | 5 min         |
//! | 9 and above     | 15 min        |

use std::time::Duration;

/// Failures tolerated before any wait is imposed
pub const DELAY_FREE_ATTEMPTS: i32 = 2;

/// Wait required after `failed_attempts` failures
pub fn required_delay(failed_attempts: i32) -> Duration {
    let seconds = match failed_attempts {
        i32::MIN..=DELAY_FREE_ATTEMPTS => 0,
        3..=4 => 30,
        5..=6 => 60,
        7..=8 => 300,
        _ => 900,
    };
    Duration::from_secs(seconds)
}

/// Wait still owed given the time elapsed since the last counted attempt.
///
/// A negative elapsed time (clock skew between instances) counts as zero.
pub fn remaining_wait(failed_attempts: i32, elapsed: chrono::Duration) -> Option<Duration> {
    if failed_attempts <= DELAY_FREE_ATTEMPTS {
        return None;
    }

    let required = required_delay(failed_attempts);
    let elapsed = elapsed.to_std().unwrap_or(Duration::ZERO);
    required.checked_sub(elapsed).filter(|wait| !wait.is_zero())
}

/// Whole seconds to advertise in `Retry-After`, rounded up
pub fn retry_after_seconds(wait: Duration) -> u64 {
    if wait.subsec_nanos() > 0 {
        wait.as_secs() + 1
    } else {
        wait.as_secs()
    }
}
