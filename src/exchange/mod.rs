//! Exchange boundary: what the agent needs from a venue, and a paper venue.
//!
//! The engine never calls an exchange. The agent fetches prices and balances
//! here, sizes and validates through the engine, then submits the resulting
//! descriptor.

mod paper;
mod types;

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::models::OrderDescriptor;

pub use paper::PaperExchange;
pub use types::{OrderAck, OrderSide};

/// Market data, balances and order submission on a venue.
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Latest traded price for `symbol`.
    async fn current_price(&self, symbol: &str) -> Result<Decimal>;

    /// Free balance of `asset` (e.g. "USDT").
    async fn available_balance(&self, asset: &str) -> Result<Decimal>;

    /// Submit a validated order. The venue response is passed through as is.
    async fn submit_order(&self, order: &OrderDescriptor) -> Result<OrderAck>;
}
