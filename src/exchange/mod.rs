//! Exchange API: signed, account-scoped operations
//!
//! Only market buys are implemented; limit orders and sells share the same
//! wire format but are not exposed yet.

pub mod client;
pub mod types;

pub use client::{parse_order_response, ExchangeClient};
pub use types::{ApiErrorBody, OrdType, OrderRequest, OrderResponse, OrderSide};
