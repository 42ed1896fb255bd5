//! Order sizing and validation engine.
//!
//! Turns a [`TradeRequest`] into an exchange-compliant [`OrderDescriptor`] or
//! a [`ValidationError`]. The engine only reads the configuration it is given
//! and holds no mutable state, so one instance can be shared freely.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{info, warn};

use crate::models::{canonical_symbol, OrderDescriptor, ProtectiveLevels, TradeRequest};

use super::quantize::quantize;
use super::{EngineConfig, PositionSizer, RiskConfig, SizingError, SymbolRuleTable, ValidationError};

/// Process-wide sequence appended to trade ids.
static TRADE_SEQ: AtomicU64 = AtomicU64::new(1);

/// Validation and order-building pipeline over a symbol rule table.
pub struct OrderEngine<'a> {
    rules: &'a SymbolRuleTable,
}

impl<'a> OrderEngine<'a> {
    pub fn new(rules: &'a SymbolRuleTable) -> Self {
        Self { rules }
    }

    pub fn from_config(config: &'a EngineConfig) -> Self {
        Self::new(&config.symbols)
    }

    // ==================== Validation ====================

    /// Check that `quantity` of `symbol` may be ordered.
    ///
    /// Returns the quantity unchanged; quantization happens when the order is
    /// built, so callers can validate before choosing a rounding.
    pub fn validate_pair(&self, symbol: &str, quantity: Decimal) -> Result<Decimal, ValidationError> {
        let symbol = canonical_symbol(symbol);

        let Some(rule) = self.rules.lookup(&symbol) else {
            return Err(ValidationError::unknown_symbol(&symbol));
        };

        if quantity <= Decimal::ZERO {
            return Err(ValidationError::non_positive_quantity(&symbol, quantity));
        }

        if quantity < rule.min_quantity {
            return Err(ValidationError::below_minimum(&symbol, quantity, rule.min_quantity));
        }

        Ok(quantity)
    }

    // ==================== Sizing ====================

    /// Risk-based order quantity. See [`PositionSizer::calculate_size`].
    ///
    /// Does not validate the result against the symbol's minimum.
    pub fn compute_position_size(
        &self,
        symbol: &str,
        available_cash: Decimal,
        current_price: Decimal,
        risk_percent: Decimal,
    ) -> Result<Decimal, SizingError> {
        PositionSizer::new(self.rules).calculate_size(
            symbol,
            available_cash,
            current_price,
            risk_percent,
        )
    }

    /// Size a position and validate it in one go.
    pub fn size_and_validate(
        &self,
        symbol: &str,
        available_cash: Decimal,
        current_price: Decimal,
        risk_percent: Decimal,
    ) -> Result<Decimal, ValidationError> {
        let size = self
            .compute_position_size(symbol, available_cash, current_price, risk_percent)
            .map_err(|e| match e {
                SizingError::UnknownSymbol(s) => ValidationError::unknown_symbol(&canonical_symbol(&s)),
                other => ValidationError::internal(&canonical_symbol(symbol), None, other.to_string()),
            })?;
        self.validate_pair(symbol, size)
    }

    /// Stop-loss and take-profit prices around `reference_price`, truncated
    /// to the symbol's price precision.
    pub fn compute_protective_levels(
        &self,
        symbol: &str,
        reference_price: Decimal,
        stop_loss_percent: Decimal,
        take_profit_percent: Decimal,
    ) -> Result<ProtectiveLevels, ValidationError> {
        let symbol = canonical_symbol(symbol);
        let rule = self
            .rules
            .lookup(&symbol)
            .ok_or_else(|| ValidationError::unknown_symbol(&symbol))?;

        if reference_price < Decimal::ZERO {
            return Err(ValidationError::internal(
                &symbol,
                None,
                format!("Reference price cannot be negative, got {reference_price}"),
            ));
        }
        if stop_loss_percent < Decimal::ZERO || stop_loss_percent >= dec!(100) {
            return Err(ValidationError::internal(
                &symbol,
                None,
                format!("Stop loss percent must be within [0, 100), got {stop_loss_percent}"),
            ));
        }
        if take_profit_percent < Decimal::ZERO {
            return Err(ValidationError::internal(
                &symbol,
                None,
                format!("Take profit percent cannot be negative, got {take_profit_percent}"),
            ));
        }

        protective_levels(
            reference_price,
            stop_loss_percent,
            take_profit_percent,
            rule.price_precision,
        )
        .ok_or_else(|| {
            ValidationError::internal(
                &symbol,
                None,
                format!("Protective level calculation overflowed at price {reference_price}"),
            )
        })
    }

    // ==================== Order Building ====================

    /// Validate, quantize and assemble an order.
    ///
    /// Every failure comes back as a [`ValidationError`]; faults outside the
    /// validation rules are reported as `InternalError`.
    pub fn build_order(
        &self,
        request: &TradeRequest,
        risk: &RiskConfig,
    ) -> Result<OrderDescriptor, ValidationError> {
        let result = self.try_build_order(request, risk, Utc::now());

        match &result {
            Ok(order) => info!(
                trade_id = %order.trade_id,
                action = %order.action,
                symbol = %order.symbol,
                quantity = %order.quantity,
                price = %order.price,
                notional = %order.notional_value,
                "Order accepted"
            ),
            Err(e) => warn!(
                kind = ?e.kind,
                symbol = %e.symbol,
                error = %e,
                "Order rejected"
            ),
        }

        result
    }

    fn try_build_order(
        &self,
        request: &TradeRequest,
        risk: &RiskConfig,
        now: DateTime<Utc>,
    ) -> Result<OrderDescriptor, ValidationError> {
        let symbol = canonical_symbol(&request.symbol);
        let internal = |msg: String| ValidationError::internal(&symbol, Some(request.quantity), msg);

        self.validate_pair(&symbol, request.quantity)?;

        let rule = self
            .rules
            .lookup(&symbol)
            .ok_or_else(|| internal(format!("Rule for {symbol} disappeared during validation")))?;

        if request.price < Decimal::ZERO {
            return Err(internal(format!("Order price cannot be negative, got {}", request.price)));
        }

        let quantity = quantize(request.quantity, rule.quantity_precision);
        let price = quantize(request.price, rule.price_precision);

        if quantity < rule.min_quantity {
            return Err(ValidationError::below_minimum(&symbol, quantity, rule.min_quantity));
        }

        let protective = if request.action.is_directional() {
            risk.validate()
                .map_err(|e| internal(format!("Malformed risk config: {e}")))?;
            let levels = protective_levels(
                price,
                risk.stop_loss_percent,
                risk.take_profit_percent,
                rule.price_precision,
            )
            .ok_or_else(|| internal(format!("Protective level calculation overflowed at price {price}")))?;
            Some(levels)
        } else {
            None
        };

        let notional_value = quantity
            .checked_mul(price)
            .ok_or_else(|| internal(format!("Notional value overflowed: {quantity} x {price}")))?;

        Ok(OrderDescriptor {
            trade_id: next_trade_id(&symbol, now),
            action: request.action,
            symbol,
            quantity,
            price,
            protective,
            notional_value,
            timestamp: now,
            reason: request.reason.clone().unwrap_or_default(),
        })
    }
}

/// Protective levels, or `None` if the arithmetic overflows.
///
/// stop = price * (1 - stop_loss_percent / 100)
/// take = price * (1 + take_profit_percent / 100)
fn protective_levels(
    reference_price: Decimal,
    stop_loss_percent: Decimal,
    take_profit_percent: Decimal,
    price_precision: u32,
) -> Option<ProtectiveLevels> {
    let stop_factor = Decimal::ONE.checked_sub(stop_loss_percent.checked_div(dec!(100))?)?;
    let take_factor = Decimal::ONE.checked_add(take_profit_percent.checked_div(dec!(100))?)?;

    Some(ProtectiveLevels {
        stop_loss_price: quantize(reference_price.checked_mul(stop_factor)?, price_precision),
        take_profit_price: quantize(reference_price.checked_mul(take_factor)?, price_precision),
    })
}

/// `crypto_<YYYYmmddHHMMSS>_<symbol>_<seq>`, unique for the process lifetime.
fn next_trade_id(symbol: &str, now: DateTime<Utc>) -> String {
    let seq = TRADE_SEQ.fetch_add(1, Ordering::Relaxed);
    format!(
        "crypto_{}_{}_{}",
        now.format("%Y%m%d%H%M%S"),
        symbol.to_lowercase(),
        seq
    )
}
