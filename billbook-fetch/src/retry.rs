//! Retry policy for API requests.
//!
//! Rate-limited requests back off linearly (`base * (attempt + 1)`);
//! transport failures wait a fixed `base` delay. Both share one cap on the
//! number of retries.

use std::time::Duration;

use crate::error::ErrorKind;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default base delay between attempts.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(2);

/// Policy for retrying failed requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Base delay between retries.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy with the given retry cap and the default base delay.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Sets the base delay.
    #[must_use]
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Returns true if another attempt is allowed after `attempt` retries
    /// have already been made.
    pub fn can_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }

    /// Delay before retry number `attempt` (zero-based) for a failure of
    /// the given kind, or `None` if that kind is never retried.
    pub fn delay_for(&self, kind: ErrorKind, attempt: u32) -> Option<Duration> {
        match kind {
            ErrorKind::RateLimited => Some(self.base_delay.saturating_mul(attempt.saturating_add(1))),
            ErrorKind::Transport => Some(self.base_delay),
            ErrorKind::Authentication | ErrorKind::ServerRejected | ErrorKind::Usage => None,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES)
    }
}
