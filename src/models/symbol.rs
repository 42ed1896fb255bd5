//! Per-symbol trading constraints.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Exchange constraints for one trading pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRule {
    /// Fractional digits kept on order quantity
    pub quantity_precision: u32,

    /// Fractional digits kept on price
    pub price_precision: u32,

    /// Smallest tradable quantity
    pub min_quantity: Decimal,

    /// Smallest price increment. Exposed for callers, not enforced.
    pub price_tick_size: Decimal,
}

impl SymbolRule {
    pub fn new(
        quantity_precision: u32,
        price_precision: u32,
        min_quantity: Decimal,
        price_tick_size: Decimal,
    ) -> Self {
        Self {
            quantity_precision,
            price_precision,
            min_quantity,
            price_tick_size,
        }
    }

    /// Rule applied to an allowlisted pair that has no explicit entry.
    pub fn conservative_default() -> Self {
        Self::new(6, 2, dec!(0.000001), dec!(0.01))
    }

    pub fn precision(&self) -> Precision {
        Precision {
            quantity: self.quantity_precision,
            price: self.price_precision,
        }
    }
}

/// Quantity/price digit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Precision {
    pub quantity: u32,
    pub price: u32,
}

/// Canonical form of a symbol key.
pub fn canonical_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}
