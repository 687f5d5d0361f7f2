//! HTTP client for the exchange (signed) endpoints
//!
//! Each client owns exactly one credential pair; credentials are injected
//! at construction and never logged.
//!
//! # Example
//! ```no_run
//! use upbit_client::exchange::ExchangeClient;
//!
//! #[tokio::main]
//! async fn main() -> upbit_client::Result<()> {
//!     // Expects UPBIT_ACCESS_KEY and UPBIT_SECRET_KEY
//!     let client = ExchangeClient::from_env().expect("missing credentials");
//!
//!     let order = client.place_market_buy("KRW-BTC", 10000.0).await?;
//!     println!("Order placed: {}", order.uuid);
//!     Ok(())
//! }
//! ```

use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::types::{ApiErrorBody, OrderRequest, OrderResponse};
use crate::auth::{canonical_query, Credentials};
use crate::common::RateLimiter;
use crate::config::ClientConfig;
use crate::error::{Result, UpbitError};

/// Order endpoints allow fewer requests per second than quotation ones
const ORDER_RATE_LIMIT: usize = 8;

/// Exchange API client for authenticated operations
#[derive(Debug, Clone)]
pub struct ExchangeClient {
    credentials: Credentials,
    http_client: Client,
    base_url: String,
    rate_limiter: RateLimiter,
    max_retries: u32,
}

impl ExchangeClient {
    /// Create a client with the given credential pair and default
    /// configuration
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self::with_config(
            Credentials::new(access_key, secret_key),
            ClientConfig::default().with_rate_limit(ORDER_RATE_LIMIT),
        )
    }

    /// Create a client with custom configuration
    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Self {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            credentials,
            http_client,
            base_url: config.base_url,
            rate_limiter: RateLimiter::new(config.rate_limiter),
            max_retries: config.max_retries,
        }
    }

    /// Create a client from `UPBIT_ACCESS_KEY` / `UPBIT_SECRET_KEY`
    pub fn from_env() -> std::result::Result<Self, std::env::VarError> {
        let credentials = Credentials::from_env()?;
        Ok(Self::with_config(
            credentials,
            ClientConfig::default().with_rate_limit(ORDER_RATE_LIMIT),
        ))
    }

    /// Share a rate limiter with other clients targeting the same venue
    pub fn with_rate_limiter(mut self, rate_limiter: RateLimiter) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    /// Place a market buy order spending `krw_amount` of the quote currency
    ///
    /// Success means the exchange created the order (HTTP 201); the returned
    /// response carries the exchange-assigned order id. Any other status
    /// becomes [`UpbitError::ExchangeRejected`] with the vendor payload when
    /// one was provided.
    pub async fn place_market_buy(
        &self,
        market: impl Into<String>,
        krw_amount: f64,
    ) -> Result<OrderResponse> {
        let order = OrderRequest::market_buy(market, krw_amount);
        self.submit_order(&order).await
    }

    /// Sign and submit an order request
    pub async fn submit_order(&self, order: &OrderRequest) -> Result<OrderResponse> {
        let params = order.to_query_params();
        let query = canonical_query(&params);

        let mut attempt = 0;
        loop {
            self.rate_limiter.acquire().await;

            let result = self.submit_order_once(&params, &query).await;
            match result {
                Ok(response) => {
                    info!(
                        "Order placed: market={}, uuid={}, state={}",
                        response.market, response.uuid, response.state
                    );
                    return Ok(response);
                }
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let backoff = Duration::from_secs(2u64.pow(attempt - 1));
                    warn!(
                        "Order submission failed (attempt {}/{}), retrying in {:?}: {}",
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

    async fn submit_order_once(
        &self,
        params: &[(&str, String)],
        query: &str,
    ) -> Result<OrderResponse> {
        // Fresh token per attempt: the nonce must never be reused
        let token = self.credentials.bearer_token(Some(query));
        let url = format!("{}/v1/orders", self.base_url);

        debug!("Submitting order to {}", url);

        let response = self
            .http_client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", token))
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        parse_order_response(status, &body)
    }
}

/// Interpret an order submission response: HTTP 201 carries the created
/// order, anything else is a rejection carrying the vendor error payload
/// when it can be parsed.
pub fn parse_order_response(status: StatusCode, body: &str) -> Result<OrderResponse> {
    if status == StatusCode::CREATED {
        return serde_json::from_str(body).map_err(|e| {
            UpbitError::MalformedResponse(format!("bad order response: {} (body: {:.200})", e, body))
        });
    }

    let (name, message) = match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => (parsed.error.name, parsed.error.message),
        Err(_) => ("unknown".to_string(), body.to_string()),
    };

    Err(UpbitError::ExchangeRejected {
        status: status.as_u16(),
        name,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREATED_BODY: &str = r#"{
        "uuid": "cdd92199-2897-4e14-9448-f923320408ad",
        "side": "bid",
        "ord_type": "price",
        "price": "10000.0",
        "state": "wait",
        "market": "KRW-BTC",
        "created_at": "2024-08-01T12:34:56+09:00"
    }"#;

    #[test]
    fn test_client_creation() {
        let client = ExchangeClient::new("access", "secret");
        assert_eq!(client.max_retries, 0);
        assert_eq!(client.rate_limiter.max_permits(), ORDER_RATE_LIMIT);
    }

    #[test]
    fn test_parse_created_order() {
        let response = parse_order_response(StatusCode::CREATED, CREATED_BODY).unwrap();
        assert_eq!(response.uuid, "cdd92199-2897-4e14-9448-f923320408ad");
        assert_eq!(response.market, "KRW-BTC");
    }

    #[test]
    fn test_parse_rejection_with_payload() {
        let body = r#"{"error":{"name":"under_min_total_bid","message":"최소주문금액 이상으로 주문해주세요"}}"#;
        let err = parse_order_response(StatusCode::BAD_REQUEST, body).unwrap_err();

        match err {
            UpbitError::ExchangeRejected {
                status,
                name,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(name, "under_min_total_bid");
                assert!(!message.is_empty());
            }
            other => panic!("expected ExchangeRejected, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejection_with_opaque_body() {
        let err = parse_order_response(StatusCode::INTERNAL_SERVER_ERROR, "gateway timeout")
            .unwrap_err();

        match err {
            UpbitError::ExchangeRejected {
                status,
                name,
                message,
            } => {
                assert_eq!(status, 500);
                assert_eq!(name, "unknown");
                assert_eq!(message, "gateway timeout");
            }
            other => panic!("expected ExchangeRejected, got {:?}", other),
        }
    }

    #[test]
    fn test_created_status_with_garbage_body_is_malformed() {
        let err = parse_order_response(StatusCode::CREATED, "not json").unwrap_err();
        assert!(matches!(err, UpbitError::MalformedResponse(_)));
    }
}
