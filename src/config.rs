//! Client configuration

use std::time::Duration;

use crate::common::RateLimiterConfig;

/// Default API host
pub const DEFAULT_BASE_URL: &str = "https://api.upbit.com";

/// Shared configuration for quotation and exchange clients
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API host; overridable for staging or test servers
    pub base_url: String,
    /// Request timeout duration
    pub timeout: Duration,
    /// Maximum number of retry attempts for transport failures.
    /// Zero (the default) means a failed request is reported immediately.
    pub max_retries: u32,
    /// Rate limiter configuration
    pub rate_limiter: RateLimiterConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 0,
            rate_limiter: RateLimiterConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Set the API host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Opt in to retrying transport failures (exponential backoff)
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set rate limit (requests per second)
    pub fn with_rate_limit(mut self, requests_per_second: usize) -> Self {
        self.rate_limiter = self.rate_limiter.with_rate(requests_per_second);
        self
    }
}
