//! Per-key in-memory rate limiter built on governor.

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota};

use cookbook_core::ports::{RateLimitError, RateLimitResult, RateLimiter};

/// Keys tracked before stale entries are pruned.
const PRUNE_THRESHOLD: usize = 10_000;

/// Quota for one key.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window.
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

/// GCRA limiter with one bucket per key (the client IP for logins).
///
/// State is per-process and not shared across instances.
pub struct InMemoryRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
    clock: DefaultClock,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Result<Self, RateLimitError> {
        let burst = NonZeroU32::new(config.max_requests)
            .ok_or_else(|| RateLimitError::Config("max_requests must be positive".into()))?;
        let period = config.window / config.max_requests;
        let quota = Quota::with_period(period)
            .ok_or_else(|| RateLimitError::Config("window must be positive".into()))?
            .allow_burst(burst);

        Ok(Self {
            limiter: DefaultKeyedRateLimiter::keyed(quota),
            clock: DefaultClock::default(),
        })
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError> {
        let outcome = self.limiter.check_key(&key.to_string());

        if self.limiter.len() > PRUNE_THRESHOLD {
            self.limiter.retain_recent();
        }

        Ok(match outcome {
            Ok(()) => RateLimitResult {
                allowed: true,
                reset_after: Duration::ZERO,
            },
            Err(not_until) => RateLimitResult {
                allowed: false,
                reset_after: not_until.wait_time_from(self.clock.now()),
            },
        })
    }
}
