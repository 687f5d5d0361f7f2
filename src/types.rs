//! Core data types shared across the client

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV candlestick data in canonical form
///
/// Vendor field names (`opening_price`, `trade_price`, ...) are mapped to
/// this shape by the quotation module. `quote_volume` is the accumulated
/// trade value in the quote currency over the candle period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub datetime: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub quote_volume: f64,
}

/// Market identifier (e.g., "KRW-BTC", "KRW-ETH")
///
/// Opaque to this crate; passed through to the API unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Market(pub String);

impl Market {
    pub fn new(s: impl Into<String>) -> Self {
        Market(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Market {
    fn from(s: &str) -> Self {
        Market(s.to_string())
    }
}

/// Live ticker snapshot for one market
///
/// `received_at` is the local UTC clock captured immediately after the
/// response arrived, so callers can measure quote staleness against
/// `trade_time`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivePrice {
    pub market: Market,
    pub price: f64,
    pub trade_time: DateTime<Utc>,
    pub received_at: DateTime<Utc>,
}

impl LivePrice {
    /// Age of the last trade relative to when the response was received
    pub fn staleness(&self) -> chrono::Duration {
        self.received_at - self.trade_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_market_display() {
        let market = Market::new("KRW-BTC");
        assert_eq!(market.to_string(), "KRW-BTC");
        assert_eq!(market.as_str(), "KRW-BTC");
    }

    #[test]
    fn test_live_price_staleness() {
        let trade_time = Utc.with_ymd_and_hms(2024, 8, 1, 12, 0, 0).unwrap();
        let received_at = Utc.with_ymd_and_hms(2024, 8, 1, 12, 0, 2).unwrap();

        let price = LivePrice {
            market: Market::new("KRW-BTC"),
            price: 85_000_000.0,
            trade_time,
            received_at,
        };

        assert_eq!(price.staleness(), chrono::Duration::seconds(2));
    }
}
