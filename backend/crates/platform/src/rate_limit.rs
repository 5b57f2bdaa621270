//! Rate Limiting Infrastructure
//!
//! Fixed-window counters keyed by bucket and client.

use std::time::Duration;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Counter namespace, e.g. `"api"` or `"auth"`
    pub bucket: &'static str,
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            bucket: "api",
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(bucket: &'static str, max_requests: u32, window: Duration) -> Self {
        Self {
            bucket,
            max_requests,
            window,
        }
    }

    pub fn window_ms(&self) -> i64 {
        i64::try_from(self.window.as_millis()).unwrap_or(i64::MAX).max(1)
    }

    /// Start of the window containing `now_ms`
    pub fn window_start(&self, now_ms: i64) -> i64 {
        let window_ms = self.window_ms();
        now_ms.div_euclid(window_ms) * window_ms
    }

    /// Decide on a request given the counter value after incrementing
    pub fn evaluate(&self, count: u32, window_start_ms: i64) -> RateLimitResult {
        RateLimitResult {
            allowed: count <= self.max_requests,
            remaining: self.max_requests.saturating_sub(count),
            reset_at_ms: window_start_ms.saturating_add(self.window_ms()),
        }
    }
}

/// Rate limit check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at_ms: i64,
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Check and increment the counter for `key` in the current window
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>>;
}
