//! Poll timing for state waits.

use std::time::Duration;

use splunk_dispatch_config::constants::{
    DEFAULT_MAX_POLL_INTERVAL_MS, DEFAULT_POLL_INTERVAL_MS, POLL_BACKOFF_FACTOR,
};

use crate::error::{ClientError, Result};

/// Bounded exponential backoff between snapshot fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay before the first re-fetch.
    pub interval: Duration,
    /// Upper bound for any single delay.
    pub max_interval: Duration,
    /// Multiplier applied to the delay after each poll.
    pub factor: u32,
    /// Overall bound for one wait; `None` waits until reached, failed or cancelled.
    pub max_wait: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_interval: Duration::from_millis(DEFAULT_MAX_POLL_INTERVAL_MS),
            factor: POLL_BACKOFF_FACTOR,
            max_wait: None,
        }
    }
}

impl PollPolicy {
    /// Fixed-interval policy, handy for tests and tight loops.
    pub fn fixed(interval: Duration) -> Self {
        Self {
            interval,
            max_interval: interval,
            factor: 1,
            max_wait: None,
        }
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(ClientError::Configuration(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        if self.max_interval < self.interval {
            return Err(ClientError::Configuration(format!(
                "max poll interval ({:?}) must not be below poll interval ({:?})",
                self.max_interval, self.interval
            )));
        }
        if self.factor == 0 {
            return Err(ClientError::Configuration(
                "poll backoff factor must be at least 1".to_string(),
            ));
        }
        if self.max_wait.is_some_and(|d| d.is_zero()) {
            return Err(ClientError::Configuration(
                "max wait must be greater than zero when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Delay to use after `current`, capped at `max_interval`.
    pub fn next_interval(&self, current: Duration) -> Duration {
        current
            .checked_mul(self.factor)
            .unwrap_or(self.max_interval)
            .min(self.max_interval)
    }
}
