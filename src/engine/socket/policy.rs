// Evolution Client: Reconnect policy
// Exponential backoff, no jitter: attempt k waits `base × 2^k`.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub base_delay: Duration,
    pub max_retries: u32,
}

impl ReconnectPolicy {
    pub fn new(base_delay: Duration, max_retries: u32) -> Self {
        ReconnectPolicy { base_delay, max_retries }
    }

    /// Delay before reconnect number `retry_count + 1`, or `None` once the
    /// ceiling is reached or a stop was requested.
    pub fn next_delay(&self, retry_count: u32, stopping: bool) -> Option<Duration> {
        if stopping || retry_count >= self.max_retries {
            return None;
        }
        Some(self.delay_for(retry_count))
    }

    /// `base × 2^retry_count`, saturating at `Duration::MAX`.
    pub fn delay_for(&self, retry_count: u32) -> Duration {
        let factor = 1u32.checked_shl(retry_count).unwrap_or(u32::MAX);
        self.base_delay.checked_mul(factor).unwrap_or(Duration::MAX)
    }
}
