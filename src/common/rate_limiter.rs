//! Token-bucket rate limiter
//!
//! Upbit enforces per-second request quotas (10/s for quotation endpoints,
//! 8/s for order endpoints). Clones of a limiter share one bucket, so every
//! client holding a clone draws from the same quota rather than pacing
//! itself with ad-hoc sleeps.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore};
use tokio::time::Instant;

/// Configuration for the rate limiter
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Maximum requests allowed per refill interval
    pub max_requests_per_second: usize,
    /// Refill interval for tokens
    pub refill_interval: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_requests_per_second: 10,
            refill_interval: Duration::from_secs(1),
        }
    }
}

impl RateLimiterConfig {
    /// Set the per-second request quota
    pub fn with_rate(mut self, requests_per_second: usize) -> Self {
        self.max_requests_per_second = requests_per_second;
        self
    }

    /// Set the token refill interval
    pub fn with_refill_interval(mut self, interval: Duration) -> Self {
        self.refill_interval = interval;
        self
    }
}

/// Token-bucket limiter; `acquire` consumes one token, blocking until the
/// bucket refills if it is empty.
#[derive(Debug)]
pub struct RateLimiter {
    permits: Arc<Semaphore>,
    max_permits: usize,
    last_refill: Arc<Mutex<Instant>>,
    refill_interval: Duration,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(config.max_requests_per_second)),
            max_permits: config.max_requests_per_second,
            last_refill: Arc::new(Mutex::new(Instant::now())),
            refill_interval: config.refill_interval,
        }
    }

    /// Limiter with a specific requests-per-second quota
    pub fn with_rate(requests_per_second: usize) -> Self {
        Self::new(RateLimiterConfig::default().with_rate(requests_per_second))
    }

    /// Take one token, waiting for a refill if none are available.
    ///
    /// The token is consumed, not returned to the pool.
    pub async fn acquire(&self) {
        self.try_refill().await;

        let permit = self
            .permits
            .acquire()
            .await
            .expect("semaphore is never closed");
        permit.forget();
    }

    /// Take one token without waiting; returns whether one was available
    pub async fn try_acquire(&self) -> bool {
        self.try_refill().await;
        match self.permits.try_acquire() {
            Ok(permit) => {
                permit.forget();
                true
            }
            Err(_) => false,
        }
    }

    /// Tokens currently available
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Bucket capacity (the configured quota)
    pub fn max_permits(&self) -> usize {
        self.max_permits
    }

    async fn try_refill(&self) {
        let mut last_refill = self.last_refill.lock().await;
        let elapsed = last_refill.elapsed();

        if elapsed >= self.refill_interval {
            // Top the bucket back up to capacity, never beyond it
            let current = self.permits.available_permits();
            let to_add = self.max_permits.saturating_sub(current);
            if to_add > 0 {
                self.permits.add_permits(to_add);
            }
            *last_refill = Instant::now();
        }
    }
}

impl Clone for RateLimiter {
    fn clone(&self) -> Self {
        Self {
            permits: Arc::clone(&self.permits),
            max_permits: self.max_permits,
            last_refill: Arc::clone(&self.last_refill),
            refill_interval: self.refill_interval,
        }
    }
}
