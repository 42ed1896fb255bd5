//! Market metadata and trading status reported to the agent.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Precision;

/// Effective trading rules for one allowlisted pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketInfo {
    pub symbol: String,
    pub precision: Precision,
    pub min_quantity: Decimal,
    pub price_tick_size: Decimal,
    pub is_active: bool,
}

/// Point-in-time trading status. Crypto trades around the clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingStatus {
    pub market_open: bool,
    pub current_time: DateTime<Utc>,
    pub trading_pairs: Vec<String>,
    pub testnet_enabled: bool,
    pub risk_management_enabled: bool,
}

impl TradingStatus {
    pub fn new(trading_pairs: Vec<String>, testnet_enabled: bool) -> Self {
        Self {
            market_open: true,
            current_time: Utc::now(),
            trading_pairs,
            testnet_enabled,
            risk_management_enabled: true,
        }
    }

    pub fn trading_pairs_count(&self) -> usize {
        self.trading_pairs.len()
    }
}

impl fmt::Display for TradingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let on_off = |b: bool| if b { "enabled" } else { "disabled" };

        writeln!(f, "=== Binance Crypto Trading Agent ===")?;
        writeln!(f, "Trading pairs:   {}", self.trading_pairs_count())?;
        writeln!(f, "Testnet:         {}", on_off(self.testnet_enabled))?;
        writeln!(f, "Risk management: {}", on_off(self.risk_management_enabled))?;
        writeln!(
            f,
            "Current time:    {}",
            self.current_time.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(
            f,
            "Market:          {}",
            if self.market_open { "24/7 trading" } else { "halted" }
        )?;

        let shown: Vec<&str> = self.trading_pairs.iter().take(5).map(String::as_str).collect();
        write!(f, "Supported pairs: {}", shown.join(", "))?;
        if self.trading_pairs.len() > shown.len() {
            write!(f, "...")?;
        }
        Ok(())
    }
}
