//! Upbit Exchange API Client
//!
//! A Rust client for the Upbit cryptocurrency exchange covering:
//! - **Candle history**: paginated minute/day/week/month OHLCV fetching with
//!   backward cursor walking and rate-limit pacing
//! - **Live ticker**: last trade price with staleness measurement
//! - **Order placement**: JWT-signed market buy orders
//!
//! Failures surface as one tagged [`UpbitError`]; nothing is retried unless
//! retries are explicitly configured.
//!
//! # Candle history
//! ```no_run
//! use upbit_client::{CandleInterval, HistoryRequest, Market, QuotationClient};
//!
//! #[tokio::main]
//! async fn main() -> upbit_client::Result<()> {
//!     let client = QuotationClient::new();
//!     let candles = client
//!         .fetch_history(
//!             &Market::new("KRW-BTC"),
//!             CandleInterval::Minutes(1),
//!             &HistoryRequest::new(450),
//!         )
//!         .await?;
//!     println!("Fetched {} candles", candles.len());
//!     Ok(())
//! }
//! ```
//!
//! # Placing an order
//! ```no_run
//! use upbit_client::ExchangeClient;
//!
//! #[tokio::main]
//! async fn main() -> upbit_client::Result<()> {
//!     let client = ExchangeClient::new("access_key", "secret_key");
//!     let order = client.place_market_buy("KRW-BTC", 10000.0).await?;
//!     println!("Order id: {}", order.uuid);
//!     Ok(())
//! }
//! ```
//!
//! # Sharing one rate-limit quota
//! ```no_run
//! use upbit_client::common::RateLimiter;
//! use upbit_client::QuotationClient;
//!
//! let limiter = RateLimiter::with_rate(10);
//! let a = QuotationClient::new().with_rate_limiter(limiter.clone());
//! let b = QuotationClient::new().with_rate_limiter(limiter);
//! // a and b now draw from the same 10 requests/second bucket
//! ```

pub mod auth;
pub mod common;
pub mod config;
pub mod error;
pub mod exchange;
pub mod quotation;
pub mod types;

pub use auth::Credentials;
pub use config::ClientConfig;
pub use error::{Result, UpbitError};
pub use exchange::{ExchangeClient, OrderRequest, OrderResponse};
pub use quotation::{CandleInterval, CandleSource, HistoryRequest, QuotationClient};
pub use types::{Candle, LivePrice, Market};
