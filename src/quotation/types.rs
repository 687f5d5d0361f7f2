//! Wire types for the quotation (public market data) endpoints
//!
//! Response shapes follow the vendor's field naming; each raw type converts
//! into the canonical model in [`crate::types`].

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, UpbitError};
use crate::types::{Candle, LivePrice, Market};

/// Candle granularity, selecting the endpoint a page is requested from
///
/// Minute candles take a unit (candle width in minutes); day, week, and
/// month candles do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandleInterval {
    Minutes(u32),
    Days,
    Weeks,
    Months,
}

/// Minute units the venue serves
pub const VALID_MINUTE_UNITS: &[u32] = &[1, 3, 5, 10, 15, 30, 60, 240];

impl CandleInterval {
    /// Path segment under `/v1/candles/` for this granularity
    pub fn path(&self) -> String {
        match self {
            CandleInterval::Minutes(unit) => format!("minutes/{}", unit),
            CandleInterval::Days => "days".to_string(),
            CandleInterval::Weeks => "weeks".to_string(),
            CandleInterval::Months => "months".to_string(),
        }
    }

    /// Whether the venue serves this granularity
    pub fn is_valid(&self) -> bool {
        match self {
            CandleInterval::Minutes(unit) => VALID_MINUTE_UNITS.contains(unit),
            _ => true,
        }
    }
}

impl std::fmt::Display for CandleInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandleInterval::Minutes(unit) => write!(f, "{}m", unit),
            CandleInterval::Days => write!(f, "1d"),
            CandleInterval::Weeks => write!(f, "1w"),
            CandleInterval::Months => write!(f, "1M"),
        }
    }
}

/// One candle as returned by the candles endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct RawCandle {
    pub market: String,
    pub candle_date_time_utc: String,
    pub opening_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub trade_price: f64,
    pub candle_acc_trade_price: f64,
    pub candle_acc_trade_volume: f64,
}

impl RawCandle {
    /// Map vendor fields onto the canonical candle shape
    pub fn into_candle(self) -> Result<Candle> {
        let datetime = parse_candle_timestamp(&self.candle_date_time_utc)?;
        Ok(Candle {
            datetime,
            open: self.opening_price,
            high: self.high_price,
            low: self.low_price,
            close: self.trade_price,
            volume: self.candle_acc_trade_volume,
            quote_volume: self.candle_acc_trade_price,
        })
    }
}

/// Candle timestamps arrive as `2024-08-01T12:34:00` (no offset), UTC
fn parse_candle_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| {
            UpbitError::MalformedResponse(format!("bad candle_date_time_utc {:?}: {}", raw, e))
        })
}

/// One ticker entry as returned by `/v1/ticker`
#[derive(Debug, Clone, Deserialize)]
pub struct RawTicker {
    pub market: String,
    /// Last trade date, UTC, as `yyyymmdd`
    pub trade_date: String,
    /// Last trade time, UTC, as `HHMMSS`
    pub trade_time: String,
    pub trade_price: f64,
}

impl RawTicker {
    /// Map onto [`LivePrice`]; `received_at` is the local clock captured by
    /// the caller right after the response arrived.
    pub fn into_live_price(self, received_at: DateTime<Utc>) -> Result<LivePrice> {
        let combined = format!("{}{}", self.trade_date, self.trade_time);
        let trade_time = NaiveDateTime::parse_from_str(&combined, "%Y%m%d%H%M%S")
            .map(|naive| naive.and_utc())
            .map_err(|e| {
                UpbitError::MalformedResponse(format!(
                    "bad trade_date/trade_time {:?}: {}",
                    combined, e
                ))
            })?;

        Ok(LivePrice {
            market: Market::new(self.market),
            price: self.trade_price,
            trade_time,
            received_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_interval_paths() {
        assert_eq!(CandleInterval::Minutes(1).path(), "minutes/1");
        assert_eq!(CandleInterval::Minutes(240).path(), "minutes/240");
        assert_eq!(CandleInterval::Days.path(), "days");
        assert_eq!(CandleInterval::Weeks.path(), "weeks");
        assert_eq!(CandleInterval::Months.path(), "months");
    }

    #[test]
    fn test_interval_validity() {
        assert!(CandleInterval::Minutes(1).is_valid());
        assert!(CandleInterval::Minutes(60).is_valid());
        assert!(!CandleInterval::Minutes(7).is_valid());
        assert!(CandleInterval::Days.is_valid());
    }

    #[test]
    fn test_raw_candle_conversion() {
        let json = r#"{
            "market": "KRW-BTC",
            "candle_date_time_utc": "2024-08-01T12:34:00",
            "candle_date_time_kst": "2024-08-01T21:34:00",
            "opening_price": 85000000.0,
            "high_price": 85500000.0,
            "low_price": 84900000.0,
            "trade_price": 85200000.0,
            "timestamp": 1722515640123,
            "candle_acc_trade_price": 1234567890.0,
            "candle_acc_trade_volume": 14.5,
            "unit": 1
        }"#;

        let raw: RawCandle = serde_json::from_str(json).unwrap();
        let candle = raw.into_candle().unwrap();

        assert_eq!(
            candle.datetime,
            Utc.with_ymd_and_hms(2024, 8, 1, 12, 34, 0).unwrap()
        );
        assert_eq!(candle.open, 85_000_000.0);
        assert_eq!(candle.close, 85_200_000.0);
        assert_eq!(candle.volume, 14.5);
        assert_eq!(candle.quote_volume, 1_234_567_890.0);
    }

    #[test]
    fn test_raw_candle_bad_timestamp() {
        let raw = RawCandle {
            market: "KRW-BTC".to_string(),
            candle_date_time_utc: "not-a-timestamp".to_string(),
            opening_price: 1.0,
            high_price: 1.0,
            low_price: 1.0,
            trade_price: 1.0,
            candle_acc_trade_price: 1.0,
            candle_acc_trade_volume: 1.0,
        };

        let err = raw.into_candle().unwrap_err();
        assert!(matches!(err, UpbitError::MalformedResponse(_)));
    }

    #[test]
    fn test_raw_ticker_conversion() {
        let received_at = Utc.with_ymd_and_hms(2024, 8, 1, 12, 15, 16).unwrap();
        let raw = RawTicker {
            market: "KRW-BTC".to_string(),
            trade_date: "20240801".to_string(),
            trade_time: "121514".to_string(),
            trade_price: 85_000_000.0,
        };

        let price = raw.into_live_price(received_at).unwrap();
        assert_eq!(
            price.trade_time,
            Utc.with_ymd_and_hms(2024, 8, 1, 12, 15, 14).unwrap()
        );
        assert_eq!(price.received_at, received_at);
        assert!(price.received_at >= price.trade_time);
    }

    #[test]
    fn test_raw_ticker_bad_time() {
        let raw = RawTicker {
            market: "KRW-BTC".to_string(),
            trade_date: "20240801".to_string(),
            trade_time: "25xx99".to_string(),
            trade_price: 1.0,
        };

        let err = raw.into_live_price(Utc::now()).unwrap_err();
        assert!(matches!(err, UpbitError::MalformedResponse(_)));
    }
}
