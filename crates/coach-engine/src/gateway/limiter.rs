//! Token-bucket rate limiting for the provider API.
//!
//! The provider enforces two limits per regional host: a short burst
//! window and a long sustained window. A request needs a token from
//! both buckets. Waiters for one region drain in arrival order: each
//! holds the region's fair async gate while it waits for tokens, so
//! nobody can jump the line. A 429 from the provider empties both
//! buckets and blocks the region until its Retry-After deadline.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Minimum sleep between token checks while waiting.
const WAIT_FLOOR: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy)]
pub struct RateLimiterConfig {
    pub short_limit: u32,
    pub short_window: Duration,
    pub long_limit: u32,
    pub long_window: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        // Development key limits: 20 req/1s, 100 req/2min.
        Self {
            short_limit: 20,
            short_window: Duration::from_secs(1),
            long_limit: 100,
            long_window: Duration::from_secs(120),
        }
    }
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    max_tokens: f64,
    /// Tokens per millisecond.
    refill_rate: f64,
    last_refill: Instant,
}

impl Bucket {
    fn new(max_tokens: u32, window: Duration) -> Self {
        let max = f64::from(max_tokens);
        Self {
            tokens: max,
            max_tokens: max,
            refill_rate: max / window.as_millis() as f64,
            last_refill: Instant::now(),
        }
    }

    fn refill(&mut self, now: Instant) {
        let elapsed_ms = now.duration_since(self.last_refill).as_millis() as f64;
        self.tokens = (self.tokens + elapsed_ms * self.refill_rate).min(self.max_tokens);
        self.last_refill = now;
    }

    /// Time until this bucket holds at least one token.
    fn time_to_token(&self) -> Duration {
        if self.tokens >= 1.0 {
            Duration::ZERO
        } else {
            Duration::from_millis(((1.0 - self.tokens) / self.refill_rate).ceil() as u64)
        }
    }
}

#[derive(Debug)]
struct LimiterState {
    short: Bucket,
    long: Bucket,
    /// Deadline before which no request may go out, after a 429.
    retry_after: Option<Instant>,
}

struct RegionLimiter {
    /// Fair async mutex; waiters acquire in FIFO order.
    gate: tokio::sync::Mutex<()>,
    state: Mutex<LimiterState>,
}

impl RegionLimiter {
    fn new(config: &RateLimiterConfig) -> Self {
        Self {
            gate: tokio::sync::Mutex::new(()),
            state: Mutex::new(LimiterState {
                short: Bucket::new(config.short_limit, config.short_window),
                long: Bucket::new(config.long_limit, config.long_window),
                retry_after: None,
            }),
        }
    }
}

/// One token-bucket limiter per region, created on first use.
pub struct RateLimiterRegistry {
    config: RateLimiterConfig,
    limiters: Mutex<HashMap<String, Arc<RegionLimiter>>>,
}

impl Default for RateLimiterRegistry {
    fn default() -> Self {
        Self::new(RateLimiterConfig::default())
    }
}

impl RateLimiterRegistry {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            limiters: Mutex::new(HashMap::new()),
        }
    }

    fn limiter(&self, region: &str) -> Arc<RegionLimiter> {
        let mut limiters = self.limiters.lock().unwrap_or_else(|e| e.into_inner());
        limiters
            .entry(region.to_string())
            .or_insert_with(|| Arc::new(RegionLimiter::new(&self.config)))
            .clone()
    }

    /// Wait until a request to the region may go out, then consume one
    /// token from each bucket. Waiters are served in arrival order.
    pub async fn acquire(&self, region: &str) {
        let limiter = self.limiter(region);
        let _turn = limiter.gate.lock().await;

        loop {
            let wait = {
                let mut state = limiter.state.lock().unwrap_or_else(|e| e.into_inner());
                let now = Instant::now();

                if let Some(deadline) = state.retry_after {
                    if now < deadline {
                        debug!(region, wait_ms = %(deadline - now).as_millis(), "blocked by retry-after");
                        deadline - now
                    } else {
                        state.retry_after = None;
                        continue;
                    }
                } else {
                    state.short.refill(now);
                    state.long.refill(now);
                    if state.short.tokens >= 1.0 && state.long.tokens >= 1.0 {
                        state.short.tokens -= 1.0;
                        state.long.tokens -= 1.0;
                        return;
                    }
                    state
                        .short
                        .time_to_token()
                        .max(state.long.time_to_token())
                        .max(WAIT_FLOOR)
                }
            };
            tokio::time::sleep(wait).await;
        }
    }

    /// Record a 429 from the provider: drain both buckets and block the
    /// region until the Retry-After deadline passes.
    pub fn report_throttled(&self, region: &str, retry_after: Duration) {
        let limiter = self.limiter(region);
        let mut state = limiter.state.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        state.retry_after = Some(now + retry_after);
        state.short.tokens = 0.0;
        state.short.last_refill = now;
        state.long.tokens = 0.0;
        state.long.last_refill = now;
    }
}
