//! HTTP client for the quotation (public market data) endpoints
//!
//! No API key is required for these endpoints.
//!
//! # Example
//! ```no_run
//! use upbit_client::quotation::{CandleInterval, HistoryRequest, QuotationClient};
//! use upbit_client::Market;
//!
//! #[tokio::main]
//! async fn main() -> upbit_client::Result<()> {
//!     let client = QuotationClient::new();
//!     let market = Market::new("KRW-BTC");
//!
//!     let candles = client
//!         .fetch_history(&market, CandleInterval::Minutes(1), &HistoryRequest::new(450))
//!         .await?;
//!     println!("Fetched {} candles", candles.len());
//!
//!     let live = client.get_ticker(&market).await?;
//!     println!("{} last traded at {}", live.market, live.price);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::history::{self, CandleSource, HistoryRequest};
use super::types::{CandleInterval, RawCandle, RawTicker};
use crate::common::RateLimiter;
use crate::config::ClientConfig;
use crate::error::{Result, UpbitError};
use crate::types::{Candle, LivePrice, Market};

/// Quotation API client
#[derive(Debug, Clone)]
pub struct QuotationClient {
    http_client: Client,
    base_url: String,
    rate_limiter: RateLimiter,
    max_retries: u32,
}

impl Default for QuotationClient {
    fn default() -> Self {
        Self::new()
    }
}

impl QuotationClient {
    /// Create a client with default configuration
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ClientConfig) -> Self {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: config.base_url,
            rate_limiter: RateLimiter::new(config.rate_limiter),
            max_retries: config.max_retries,
        }
    }

    /// Share a rate limiter with other clients targeting the same venue,
    /// so their combined request rate stays inside one quota
    pub fn with_rate_limiter(mut self, rate_limiter: RateLimiter) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    /// GET a JSON endpoint, respecting the rate limiter and the opt-in
    /// retry policy (transport failures only)
    async fn get_json<T>(&self, url: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut attempt = 0;
        loop {
            self.rate_limiter.acquire().await;

            let result = self.get_json_once(url, query).await;
            match result {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let backoff = Duration::from_secs(2u64.pow(attempt - 1));
                    warn!(
                        "Request failed (attempt {}/{}), retrying in {:?}: {}",
                        attempt,
                        self.max_retries + 1,
                        backoff,
                        e
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_json_once<T>(&self, url: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .http_client
            .get(url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| UpbitError::MalformedResponse(format!("{} (body: {:.200})", e, text)))
    }

    /// Fetch one page of candles (at most 200) ending at `to`
    pub async fn get_candles(
        &self,
        market: &Market,
        interval: CandleInterval,
        count: usize,
        to: DateTime<Utc>,
    ) -> Result<Vec<Candle>> {
        let url = format!("{}/v1/candles/{}", self.base_url, interval.path());
        let query = [
            ("market", market.to_string()),
            ("count", count.to_string()),
            ("to", to.format("%Y-%m-%d %H:%M:%S").to_string()),
        ];

        debug!("Fetching candles: market={}, interval={}, count={}", market, interval, count);

        let raw: Vec<RawCandle> = self.get_json(&url, &query).await?;
        raw.into_iter().map(RawCandle::into_candle).collect()
    }

    /// Fetch a candle history larger than one page allows, walking the
    /// cursor backward in time and merging pages into one ascending series.
    /// See [`history::fetch_history`] for the exact contract.
    pub async fn fetch_history(
        &self,
        market: &Market,
        interval: CandleInterval,
        request: &HistoryRequest,
    ) -> Result<Vec<Candle>> {
        history::fetch_history(self, market, interval, request).await
    }

    /// Fetch the live ticker for one market
    ///
    /// `received_at` on the returned value is the local UTC clock captured
    /// immediately after the response, for staleness measurement.
    pub async fn get_ticker(&self, market: &Market) -> Result<LivePrice> {
        let url = format!("{}/v1/ticker", self.base_url);
        let query = [("markets", market.to_string())];

        let raw: Vec<RawTicker> = self.get_json(&url, &query).await?;
        let received_at = Utc::now();

        let ticker = raw.into_iter().next().ok_or_else(|| {
            UpbitError::MalformedResponse(format!("empty ticker response for {}", market))
        })?;
        ticker.into_live_price(received_at)
    }
}

#[async_trait]
impl CandleSource for QuotationClient {
    async fn fetch_page(
        &self,
        market: &Market,
        interval: CandleInterval,
        count: usize,
        to: DateTime<Utc>,
    ) -> Result<Vec<Candle>> {
        self.get_candles(market, interval, count, to).await
    }
}
