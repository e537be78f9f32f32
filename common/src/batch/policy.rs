use std::time::Duration;

/// Pacing and retry parameters of a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPolicy {
    /// Delay before the second item.
    pub base_delay_ms: u64,
    /// Added to the inter-item delay every `delay_step_every` items.
    pub delay_step_ms: u64,
    pub delay_step_every: usize,
    pub max_delay_ms: u64,
    /// Total attempts per item, counting the first one.
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
    pub backoff_jitter_ms: u64,
    pub max_backoff_ms: u64,
    /// Used when a 429 reply carries no retry hint.
    pub default_retry_after_secs: u64,
    pub rate_limit_jitter_ms: u64,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            base_delay_ms: 2_000,
            delay_step_ms: 1_000,
            delay_step_every: 5,
            max_delay_ms: 6_000,
            max_attempts: 3,
            backoff_base_ms: 5_000,
            backoff_jitter_ms: 3_000,
            max_backoff_ms: 30_000,
            default_retry_after_secs: 60,
            rate_limit_jitter_ms: 2_000,
        }
    }
}

impl BatchPolicy {
    /// Pause before the item at `index`; the first item starts immediately.
    pub fn inter_item_delay(&self, index: usize) -> Option<Duration> {
        if index == 0 {
            return None;
        }
        let steps = (index / self.delay_step_every.max(1)) as u64;
        let ms = self
            .base_delay_ms
            .saturating_add(steps.saturating_mul(self.delay_step_ms))
            .min(self.max_delay_ms);
        Some(Duration::from_millis(ms))
    }

    /// Wait after the `attempts`-th failed attempt: `2^attempts * base + jitter`,
    /// capped at `max_backoff_ms`.
    pub fn backoff(&self, attempts: u32, jitter_ms: u64) -> Duration {
        let exponent = attempts.min(16);
        let ms = self
            .backoff_base_ms
            .saturating_mul(1u64 << exponent)
            .saturating_add(jitter_ms)
            .min(self.max_backoff_ms);
        Duration::from_millis(ms)
    }

    /// Wait after a rate-limited reply: the server hint (or the default) plus jitter.
    pub fn rate_limit_wait(&self, retry_after_secs: Option<u64>, jitter_ms: u64) -> Duration {
        let secs = retry_after_secs.unwrap_or(self.default_retry_after_secs);
        Duration::from_millis(secs.saturating_mul(1_000).saturating_add(jitter_ms))
    }
}
