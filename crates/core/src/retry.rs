//! Retry policy for upstream calls.
//!
//! Exponential backoff with optional jitter. Only the delay schedule lives
//! here; the async loop that sleeps between attempts belongs to the server.

use std::time::Duration;

use rand::Rng;

/// How many times to try an upstream call and how long to wait in between.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    pub multiplier: f64,
    /// Add up to `jitter_ratio` of random spread to each delay.
    pub jitter: bool,
    pub jitter_ratio: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
            multiplier: 2.0,
            jitter: true,
            jitter_ratio: 0.2,
        }
    }
}

impl RetryPolicy {
    /// Same schedule without jitter, for deterministic delays.
    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay to wait after the given failed attempt (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let base = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = base.min(self.max_delay.as_secs_f64());

        if !self.jitter || capped <= 0.0 {
            return Duration::from_secs_f64(capped.max(0.0));
        }

        let range = capped * self.jitter_ratio.clamp(0.0, 1.0);
        let spread = if range > 0.0 {
            rand::rng().random_range(-range..=range)
        } else {
            0.0
        };
        Duration::from_secs_f64((capped + spread).max(0.0))
    }
}
