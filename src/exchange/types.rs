//! Venue-side order types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::TradeAction;

/// Order side on the venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Venue side for a trade action; `None` for HOLD.
    pub fn from_action(action: TradeAction) -> Option<Self> {
        match action {
            TradeAction::Buy => Some(Self::Buy),
            TradeAction::Sell => Some(Self::Sell),
            TradeAction::Hold => None,
        }
    }
}

/// Venue acknowledgement of a submitted order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    pub order_id: u64,
    /// Our trade id, echoed back
    pub client_order_id: String,
    pub symbol: String,
    pub side: OrderSide,
    pub price: Decimal,
    pub orig_qty: Decimal,
    pub executed_qty: Decimal,
    /// Venue status string (e.g. "FILLED"), not interpreted here
    pub status: String,
    pub transact_time: DateTime<Utc>,
}
