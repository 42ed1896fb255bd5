//! Order descriptor produced by the engine for the exchange client.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TradeAction;

/// Stop-loss and take-profit prices attached to a directional order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectiveLevels {
    pub stop_loss_price: Decimal,
    pub take_profit_price: Decimal,
}

/// Exchange-compliant order. Quantity and price are already quantized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDescriptor {
    /// Unique within the process lifetime
    pub trade_id: String,

    pub action: TradeAction,

    /// Canonical (upper-case) symbol
    pub symbol: String,

    pub quantity: Decimal,
    pub price: Decimal,

    /// Present only for BUY/SELL
    pub protective: Option<ProtectiveLevels>,

    /// quantity * price, in quote currency
    pub notional_value: Decimal,

    pub timestamp: DateTime<Utc>,

    #[serde(default)]
    pub reason: String,
}

impl OrderDescriptor {
    pub fn stop_loss_price(&self) -> Option<Decimal> {
        self.protective.map(|p| p.stop_loss_price)
    }

    pub fn take_profit_price(&self) -> Option<Decimal> {
        self.protective.map(|p| p.take_profit_price)
    }
}

impl fmt::Display for OrderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Crypto Order {} ===", self.trade_id)?;
        writeln!(f, "Action:      {}", self.action)?;
        writeln!(f, "Pair:        {}", self.symbol)?;
        writeln!(f, "Quantity:    {}", self.quantity)?;
        writeln!(f, "Price:       ${}", self.price)?;
        writeln!(f, "Notional:    ${}", self.notional_value)?;
        if let Some(levels) = &self.protective {
            writeln!(f, "Stop Loss:   ${}", levels.stop_loss_price)?;
            writeln!(f, "Take Profit: ${}", levels.take_profit_price)?;
        }
        if !self.reason.is_empty() {
            writeln!(f, "Reason:      {}", self.reason)?;
        }
        writeln!(f, "Issued:      {}", self.timestamp.to_rfc3339())?;
        if self.action.is_directional() {
            write!(f, "WARNING: crypto trading is highly risky, size accordingly")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make_order(action: TradeAction, protective: Option<ProtectiveLevels>) -> OrderDescriptor {
        OrderDescriptor {
            trade_id: "crypto_20250101000000_btcusdt_1".to_string(),
            action,
            symbol: "BTCUSDT".to_string(),
            quantity: dec!(0.004000),
            price: dec!(50000.00),
            protective,
            notional_value: dec!(200.0000000),
            timestamp: Utc::now(),
            reason: "breakout".to_string(),
        }
    }

    #[test]
    fn test_display_directional() {
        let order = make_order(
            TradeAction::Buy,
            Some(ProtectiveLevels {
                stop_loss_price: dec!(47500.00),
                take_profit_price: dec!(55000.00),
            }),
        );
        let text = order.to_string();

        assert!(text.contains("Action:      BUY"));
        assert!(text.contains("Quantity:    0.004000"));
        assert!(text.contains("Stop Loss:   $47500.00"));
        assert!(text.contains("Take Profit: $55000.00"));
        assert!(text.contains("Reason:      breakout"));
        assert!(text.contains("WARNING"));
    }

    #[test]
    fn test_display_hold_has_no_levels_or_warning() {
        let order = make_order(TradeAction::Hold, None);
        let text = order.to_string();

        assert!(!text.contains("Stop Loss"));
        assert!(!text.contains("WARNING"));
        assert_eq!(order.stop_loss_price(), None);
        assert_eq!(order.take_profit_price(), None);
    }
}
