//! Rate limiter implementation
//!
//! Provides sliding window rate limiting keyed by opaque strings
//! (e.g. `otp:{email}`, `login:{email}`).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// Limits applied to a key
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Maximum requests inside the window
    pub max_requests: u32,
    /// Window length in seconds
    pub window_secs: u64,
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        // 5 attempts per 5 minutes
        Self::new(5, 300)
    }
}

/// Result of a rate limit check
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    /// Whether the request is allowed
    pub allowed: bool,
    /// Remaining requests in the current window
    pub remaining: u32,
    /// Total limit for the window
    pub limit: u32,
    /// Time until the limit resets (in seconds)
    pub reset_in_seconds: u64,
}

/// Sliding window rate limiter
#[derive(Debug)]
pub struct RateLimiter {
    /// Per-key request timestamps
    records: Arc<RwLock<HashMap<String, Vec<Instant>>>>,
    /// Cleanup interval
    cleanup_interval: Duration,
    /// Longest window any caller uses; stale records older than this go away
    max_window: Duration,
    /// Last cleanup time
    last_cleanup: Arc<RwLock<Instant>>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            cleanup_interval: Duration::from_secs(300),
            max_window: Duration::from_secs(3600),
            last_cleanup: Arc::new(RwLock::new(Instant::now())),
        }
    }

    /// Check if a request is allowed under the limit, without recording it
    pub async fn check(&self, key: &str, config: &RateLimitConfig) -> RateLimitResult {
        self.maybe_cleanup().await;

        let now = Instant::now();
        let records = self.records.read().await;

        self.calculate(records.get(key), config, now)
    }

    /// Check and record in one operation
    pub async fn check_and_record(&self, key: &str, config: &RateLimitConfig) -> RateLimitResult {
        self.maybe_cleanup().await;

        let now = Instant::now();
        let mut records = self.records.write().await;

        let result = self.calculate(records.get(key), config, now);

        if result.allowed {
            records.entry(key.to_string()).or_default().push(now);
        }

        result
    }

    /// Reset the limit for a key
    pub async fn reset(&self, key: &str) {
        let mut records = self.records.write().await;
        records.remove(key);
    }

    fn calculate(
        &self,
        records: Option<&Vec<Instant>>,
        config: &RateLimitConfig,
        now: Instant,
    ) -> RateLimitResult {
        let window = Duration::from_secs(config.window_secs);
        let window_start = now.checked_sub(window).unwrap_or(now);

        let records = match records {
            Some(r) => r,
            None => {
                return RateLimitResult {
                    allowed: true,
                    remaining: config.max_requests.saturating_sub(1),
                    limit: config.max_requests,
                    reset_in_seconds: config.window_secs,
                };
            }
        };

        let in_window: Vec<&Instant> = records.iter().filter(|t| **t >= window_start).collect();
        let count = in_window.len() as u32;

        if count >= config.max_requests {
            let reset_in = in_window
                .iter()
                .min()
                .map(|t| {
                    let elapsed = now.duration_since(**t);
                    config.window_secs.saturating_sub(elapsed.as_secs())
                })
                .unwrap_or(config.window_secs);

            return RateLimitResult {
                allowed: false,
                remaining: 0,
                limit: config.max_requests,
                reset_in_seconds: reset_in,
            };
        }

        RateLimitResult {
            allowed: true,
            remaining: config.max_requests.saturating_sub(count + 1),
            limit: config.max_requests,
            reset_in_seconds: config.window_secs,
        }
    }

    async fn maybe_cleanup(&self) {
        let should_cleanup = {
            let last = self.last_cleanup.read().await;
            last.elapsed() >= self.cleanup_interval
        };

        if should_cleanup {
            let mut last = self.last_cleanup.write().await;
            *last = Instant::now();

            let now = Instant::now();
            let cutoff = now.checked_sub(self.max_window).unwrap_or(now);

            let mut records = self.records.write().await;

            for timestamps in records.values_mut() {
                timestamps.retain(|t| *t >= cutoff);
            }

            records.retain(|_, v| !v.is_empty());
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max: u32) -> RateLimitConfig {
        RateLimitConfig::new(max, 300)
    }

    #[tokio::test]
    async fn test_allows_first_request() {
        let limiter = RateLimiter::new();

        let result = limiter.check("otp:a@example.com", &config(5)).await;

        assert!(result.allowed);
        assert_eq!(result.remaining, 4);
        assert_eq!(result.limit, 5);
    }

    #[tokio::test]
    async fn test_blocks_over_limit() {
        let limiter = RateLimiter::new();
        let cfg = config(2);

        limiter.check_and_record("otp:a@example.com", &cfg).await;
        limiter.check_and_record("otp:a@example.com", &cfg).await;

        let result = limiter.check("otp:a@example.com", &cfg).await;

        assert!(!result.allowed);
        assert_eq!(result.remaining, 0);
        assert!(result.reset_in_seconds <= 300);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let limiter = RateLimiter::new();
        let cfg = config(1);

        limiter.check_and_record("otp:a@example.com", &cfg).await;

        let other = limiter.check("otp:b@example.com", &cfg).await;
        assert!(other.allowed);

        let same = limiter.check("otp:a@example.com", &cfg).await;
        assert!(!same.allowed);
    }

    #[tokio::test]
    async fn test_blocked_requests_are_not_recorded() {
        let limiter = RateLimiter::new();
        let cfg = config(1);

        limiter.check_and_record("login:a@example.com", &cfg).await;

        // Repeated blocked attempts must not extend the window
        for _ in 0..3 {
            let result = limiter.check_and_record("login:a@example.com", &cfg).await;
            assert!(!result.allowed);
        }

        let records = limiter.records.read().await;
        assert_eq!(records.get("login:a@example.com").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reset() {
        let limiter = RateLimiter::new();
        let cfg = config(1);

        limiter.check_and_record("otp:a@example.com", &cfg).await;
        assert!(!limiter.check("otp:a@example.com", &cfg).await.allowed);

        limiter.reset("otp:a@example.com").await;

        assert!(limiter.check("otp:a@example.com", &cfg).await.allowed);
    }
}
