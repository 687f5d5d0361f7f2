//! Unified error type for all client operations
//!
//! Every fallible operation in this crate surfaces one of these variants;
//! there are no stringly-typed sentinels and no partial results on failure.

use thiserror::Error;

/// Errors returned by quotation and exchange operations
#[derive(Debug, Error)]
pub enum UpbitError {
    /// Requested candle count exceeds the hard ceiling; raised before any
    /// network I/O happens.
    #[error("requested {requested} candles exceeds the limit of {limit}")]
    RequestTooLarge { requested: usize, limit: usize },

    /// Transport-level failure (connection, timeout, TLS, ...)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The exchange rejected a signed request with a non-success status
    #[error("exchange rejected request ({status}): {name}: {message}")]
    ExchangeRejected {
        status: u16,
        name: String,
        message: String,
    },
}

impl UpbitError {
    /// Whether a retry could plausibly succeed (transport failures only;
    /// rejections and malformed payloads are deterministic).
    pub fn is_retryable(&self) -> bool {
        matches!(self, UpbitError::Network(_))
    }
}

impl From<serde_json::Error> for UpbitError {
    fn from(err: serde_json::Error) -> Self {
        UpbitError::MalformedResponse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, UpbitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_too_large_display() {
        let err = UpbitError::RequestTooLarge {
            requested: 5000,
            limit: 2000,
        };
        let msg = err.to_string();
        assert!(msg.contains("5000"));
        assert!(msg.contains("2000"));
    }

    #[test]
    fn test_exchange_rejected_display() {
        let err = UpbitError::ExchangeRejected {
            status: 400,
            name: "insufficient_funds_bid".to_string(),
            message: "주문가능한 금액(KRW)이 부족합니다.".to_string(),
        };
        assert!(err.to_string().contains("400"));
        assert!(err.to_string().contains("insufficient_funds_bid"));
    }

    #[test]
    fn test_retryable_classification() {
        let too_large = UpbitError::RequestTooLarge {
            requested: 3000,
            limit: 2000,
        };
        assert!(!too_large.is_retryable());

        let malformed = UpbitError::MalformedResponse("missing field".to_string());
        assert!(!malformed.is_retryable());

        let rejected = UpbitError::ExchangeRejected {
            status: 401,
            name: "invalid_access_key".to_string(),
            message: "잘못된 엑세스 키입니다.".to_string(),
        };
        assert!(!rejected.is_retryable());
    }

    #[test]
    fn test_json_error_maps_to_malformed() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: UpbitError = parse_err.into();
        assert!(matches!(err, UpbitError::MalformedResponse(_)));
    }
}
