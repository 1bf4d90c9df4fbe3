//! Exponential backoff with jitter for connection retries.

use std::time::Duration;

use rand::Rng;

use crate::ReconnectPolicy;

/// Hands out retry delays for one connection attempt sequence.
#[derive(Debug, Clone)]
pub struct Backoff {
    policy: ReconnectPolicy,
    retries: u32,
}

impl Backoff {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self { policy, retries: 0 }
    }

    /// Number of delays handed out so far.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Delay before the next attempt, or `None` once every attempt the
    /// policy allows has been used.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.retries.saturating_add(1) >= self.policy.max_attempts {
            return None;
        }
        let doubled = self
            .policy
            .initial_delay
            .saturating_mul(1u32 << self.retries.min(16));
        let base = doubled.min(self.policy.max_delay);
        self.retries += 1;
        Some(base + self.jitter())
    }

    fn jitter(&self) -> Duration {
        let max = self.policy.jitter.as_millis() as u64;
        if max == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..=max))
    }
}
