//! Wire types for the exchange (signed) endpoints

use serde::{Deserialize, Serialize};

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// Buy
    Bid,
    /// Sell
    Ask,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Bid => write!(f, "bid"),
            OrderSide::Ask => write!(f, "ask"),
        }
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrdType {
    /// Limit order (requires `volume` and `price`)
    Limit,
    /// Market buy by total spend (requires `price` only)
    Price,
    /// Market sell by volume (requires `volume` only)
    Market,
}

impl std::fmt::Display for OrdType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrdType::Limit => write!(f, "limit"),
            OrdType::Price => write!(f, "price"),
            OrdType::Market => write!(f, "market"),
        }
    }
}

/// Request to create a new order
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    pub market: String,
    pub side: OrderSide,
    pub ord_type: OrdType,
    /// Total spend in the quote currency for market buys; unit price for
    /// limit orders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
}

impl OrderRequest {
    /// Market buy spending `krw_amount` of the quote currency
    pub fn market_buy(market: impl Into<String>, krw_amount: f64) -> Self {
        Self {
            market: market.into(),
            side: OrderSide::Bid,
            ord_type: OrdType::Price,
            price: Some(format_amount(krw_amount)),
            volume: None,
        }
    }

    /// Query parameters in the order they are both signed and sent
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("market", self.market.clone()),
            ("side", self.side.to_string()),
        ];
        if let Some(volume) = &self.volume {
            params.push(("volume", volume.clone()));
        }
        if let Some(price) = &self.price {
            params.push(("price", price.clone()));
        }
        params.push(("ord_type", self.ord_type.to_string()));
        params
    }
}

/// Format a monetary amount without a trailing `.0` on whole values
fn format_amount(amount: f64) -> String {
    format!("{}", amount)
}

/// Exchange response for a created order (HTTP 201)
#[derive(Debug, Clone, Deserialize)]
pub struct OrderResponse {
    /// Exchange-assigned order identifier
    pub uuid: String,
    pub side: OrderSide,
    pub ord_type: OrdType,
    pub market: String,
    pub state: String,
    pub created_at: String,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
    #[serde(default)]
    pub executed_volume: Option<String>,
    #[serde(default)]
    pub paid_fee: Option<String>,
    #[serde(default)]
    pub trades_count: Option<u64>,
}

/// Vendor error payload on a rejected request
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    pub name: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_buy_request() {
        let order = OrderRequest::market_buy("KRW-BTC", 10000.0);
        assert_eq!(order.market, "KRW-BTC");
        assert_eq!(order.side, OrderSide::Bid);
        assert_eq!(order.ord_type, OrdType::Price);
        assert_eq!(order.price.as_deref(), Some("10000"));
        assert!(order.volume.is_none());
    }

    #[test]
    fn test_query_params_ordering() {
        let order = OrderRequest::market_buy("KRW-BTC", 5000.5);
        let params = order.to_query_params();
        assert_eq!(
            params,
            vec![
                ("market", "KRW-BTC".to_string()),
                ("side", "bid".to_string()),
                ("price", "5000.5".to_string()),
                ("ord_type", "price".to_string()),
            ]
        );
    }

    #[test]
    fn test_order_response_parsing() {
        let json = r#"{
            "uuid": "cdd92199-2897-4e14-9448-f923320408ad",
            "side": "bid",
            "ord_type": "price",
            "price": "10000.0",
            "state": "wait",
            "market": "KRW-BTC",
            "created_at": "2024-08-01T12:34:56+09:00",
            "reserved_fee": "5.0",
            "remaining_fee": "5.0",
            "paid_fee": "0.0",
            "locked": "10005.0",
            "executed_volume": "0.0",
            "trades_count": 0
        }"#;

        let response: OrderResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.uuid, "cdd92199-2897-4e14-9448-f923320408ad");
        assert_eq!(response.side, OrderSide::Bid);
        assert_eq!(response.ord_type, OrdType::Price);
        assert_eq!(response.state, "wait");
        assert_eq!(response.trades_count, Some(0));
    }

    #[test]
    fn test_error_body_parsing() {
        let json = r#"{"error":{"name":"insufficient_funds_bid","message":"주문가능한 금액(KRW)이 부족합니다."}}"#;
        let body: ApiErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.error.name, "insufficient_funds_bid");
        assert!(!body.error.message.is_empty());
    }
}
