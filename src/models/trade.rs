//! Trade request model: what the agent asks the engine to turn into an order.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Action requested by the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    Buy,
    Sell,
    /// Informational no-op; never gets protective levels.
    Hold,
}

impl TradeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeAction::Buy => "BUY",
            TradeAction::Sell => "SELL",
            TradeAction::Hold => "HOLD",
        }
    }

    /// Returns true for actions that open or close exposure.
    pub fn is_directional(&self) -> bool {
        matches!(self, TradeAction::Buy | TradeAction::Sell)
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            "HOLD" => Ok(Self::Hold),
            other => Err(format!("unknown trade action: {other}")),
        }
    }
}

/// A trade the agent wants to place, before sizing rules are applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRequest {
    pub action: TradeAction,

    /// Trading pair, any case (e.g. "btcusdt")
    pub symbol: String,

    /// Requested base-asset quantity, unquantized
    pub quantity: Decimal,

    /// Limit/reference price in quote currency, unquantized
    pub price: Decimal,

    /// Free-form justification from the agent
    #[serde(default)]
    pub reason: Option<String>,
}

impl TradeRequest {
    pub fn new(
        action: TradeAction,
        symbol: impl Into<String>,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            action,
            symbol: symbol.into(),
            quantity,
            price,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}
