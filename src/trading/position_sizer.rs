//! Risk-based position sizing.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::quantize::quantize;
use super::{SizingError, SymbolRuleTable};

/// Share of available cash risked per trade when the caller gives none.
pub const DEFAULT_RISK_PERCENT: Decimal = dec!(2.0);

/// Calculator for risk-bounded order quantities.
pub struct PositionSizer<'a> {
    rules: &'a SymbolRuleTable,
}

impl<'a> PositionSizer<'a> {
    pub fn new(rules: &'a SymbolRuleTable) -> Self {
        Self { rules }
    }

    /// Calculate how much of `symbol` to buy with a slice of available cash.
    ///
    /// size = (available_cash * risk_percent / 100) / current_price
    ///
    /// truncated to the symbol's quantity precision. The result is not
    /// checked against the symbol's minimum quantity; run it through
    /// validation before treating it as an order.
    ///
    /// # Arguments
    /// * `available_cash` - Free quote balance, must not be negative
    /// * `current_price` - Latest price, must be positive
    /// * `risk_percent` - Percentage of cash to commit (0 to 100)
    pub fn calculate_size(
        &self,
        symbol: &str,
        available_cash: Decimal,
        current_price: Decimal,
        risk_percent: Decimal,
    ) -> Result<Decimal, SizingError> {
        let rule = self
            .rules
            .lookup(symbol)
            .ok_or_else(|| SizingError::UnknownSymbol(symbol.to_string()))?;

        if current_price <= Decimal::ZERO {
            return Err(SizingError::NonPositivePrice(current_price));
        }
        if available_cash < Decimal::ZERO {
            return Err(SizingError::NegativeCash(available_cash));
        }
        if risk_percent < Decimal::ZERO || risk_percent > dec!(100) {
            return Err(SizingError::InvalidRiskPercent(risk_percent));
        }

        let overflow = || SizingError::Overflow(symbol.to_string());

        // Cash at risk
        let risk_amount = available_cash
            .checked_mul(risk_percent)
            .and_then(|v| v.checked_div(dec!(100)))
            .ok_or_else(overflow)?;

        let raw_size = risk_amount.checked_div(current_price).ok_or_else(overflow)?;
        let size = quantize(raw_size, rule.quantity_precision);

        debug!(
            symbol = %symbol,
            risk_amount = %risk_amount,
            raw_size = %raw_size,
            size = %size,
            "Calculated position size"
        );

        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_btc_example() {
        let table = SymbolRuleTable::default();
        let sizer = PositionSizer::new(&table);

        let size = sizer
            .calculate_size("BTCUSDT", dec!(10000), dec!(50000), DEFAULT_RISK_PERCENT)
            .unwrap();

        // 200 / 50000 = 0.004
        assert_eq!(size, dec!(0.004));
        assert_eq!(size.to_string(), "0.004000");
    }

    #[test]
    fn test_truncates_to_quantity_precision() {
        let table = SymbolRuleTable::default();
        let sizer = PositionSizer::new(&table);

        // 300 / 0.37 = 810.81... ; ADA trades whole units
        let size = sizer
            .calculate_size("adausdt", dec!(10000), dec!(0.37), dec!(3))
            .unwrap();
        assert_eq!(size, dec!(810));

        // 200 / 3333 = 0.0600060006... ; ETH keeps 5 digits
        let size = sizer
            .calculate_size("ETHUSDT", dec!(10000), dec!(3333), dec!(2))
            .unwrap();
        assert_eq!(size, dec!(0.06000));
    }

    #[test]
    fn test_output_is_canonical() {
        let table = SymbolRuleTable::default();
        let sizer = PositionSizer::new(&table);

        for (symbol, cash, price) in [
            ("BTCUSDT", dec!(12345.67), dec!(61234.5)),
            ("XRPUSDT", dec!(999.99), dec!(0.5234)),
            ("LINKUSDT", dec!(50), dec!(14.321)),
        ] {
            let size = sizer.calculate_size(symbol, cash, price, dec!(2)).unwrap();
            let rule = table.lookup(symbol).unwrap();
            assert_eq!(quantize(size, rule.quantity_precision), size);
        }
    }

    #[test]
    fn test_caller_errors_fail_fast() {
        let table = SymbolRuleTable::default();
        let sizer = PositionSizer::new(&table);

        assert_eq!(
            sizer.calculate_size("BTCUSDT", dec!(1000), Decimal::ZERO, dec!(2)),
            Err(SizingError::NonPositivePrice(Decimal::ZERO))
        );
        assert_eq!(
            sizer.calculate_size("BTCUSDT", dec!(1000), dec!(-5), dec!(2)),
            Err(SizingError::NonPositivePrice(dec!(-5)))
        );
        assert_eq!(
            sizer.calculate_size("BTCUSDT", dec!(-1), dec!(50000), dec!(2)),
            Err(SizingError::NegativeCash(dec!(-1)))
        );
        assert_eq!(
            sizer.calculate_size("BTCUSDT", dec!(1000), dec!(50000), dec!(150)),
            Err(SizingError::InvalidRiskPercent(dec!(150)))
        );
    }

    #[test]
    fn test_unknown_symbol() {
        let table = SymbolRuleTable::default();
        let sizer = PositionSizer::new(&table);

        assert_eq!(
            sizer.calculate_size("DOGEUSDT", dec!(1000), dec!(0.1), dec!(2)),
            Err(SizingError::UnknownSymbol("DOGEUSDT".to_string()))
        );
    }

    #[test]
    fn test_zero_cash_gives_zero_size() {
        let table = SymbolRuleTable::default();
        let sizer = PositionSizer::new(&table);

        let size = sizer
            .calculate_size("BTCUSDT", Decimal::ZERO, dec!(50000), dec!(2))
            .unwrap();
        assert!(size.is_zero());
    }
}
