//! Quotation API: public market data
//!
//! - [`client`]: HTTP client for candle and ticker endpoints
//! - [`history`]: paginated history fetching over any [`CandleSource`]
//! - [`types`]: vendor wire types and granularity selection

pub mod client;
pub mod history;
pub mod types;

pub use client::QuotationClient;
pub use history::{
    fetch_history, CandleSource, HistoryRequest, DEFAULT_PAGE_DELAY, MAX_CANDLES_PER_REQUEST,
    MAX_TOTAL_CANDLES,
};
pub use types::{CandleInterval, RawCandle, RawTicker, VALID_MINUTE_UNITS};
