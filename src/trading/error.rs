//! Rejection and failure types returned by the sizing and validation engine.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Why an order was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValidationErrorKind {
    /// Symbol is not on the trading-pair allowlist
    UnknownSymbol,
    /// Requested quantity is zero or negative
    NonPositiveQuantity,
    /// Requested quantity is below the symbol's minimum
    BelowMinimumQuantity,
    /// Fault the pipeline did not anticipate (overflow, malformed config)
    InternalError,
}

/// Order rejection. Carries enough context to be shown to an operator as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub message: String,
    pub symbol: String,
    pub quantity: Option<Decimal>,
    /// The limit that was violated, if any
    pub threshold: Option<Decimal>,
}

impl ValidationError {
    pub fn unknown_symbol(symbol: &str) -> Self {
        Self {
            kind: ValidationErrorKind::UnknownSymbol,
            message: format!("Unsupported trading pair: {symbol}"),
            symbol: symbol.to_string(),
            quantity: None,
            threshold: None,
        }
    }

    pub fn non_positive_quantity(symbol: &str, quantity: Decimal) -> Self {
        Self {
            kind: ValidationErrorKind::NonPositiveQuantity,
            message: format!("Order quantity must be greater than 0, got {quantity}"),
            symbol: symbol.to_string(),
            quantity: Some(quantity),
            threshold: Some(Decimal::ZERO),
        }
    }

    pub fn below_minimum(symbol: &str, quantity: Decimal, min_quantity: Decimal) -> Self {
        Self {
            kind: ValidationErrorKind::BelowMinimumQuantity,
            message: format!(
                "{symbol} minimum order quantity is {min_quantity}, got {quantity}"
            ),
            symbol: symbol.to_string(),
            quantity: Some(quantity),
            threshold: Some(min_quantity),
        }
    }

    pub fn internal(symbol: &str, quantity: Option<Decimal>, message: impl Into<String>) -> Self {
        Self {
            kind: ValidationErrorKind::InternalError,
            message: message.into(),
            symbol: symbol.to_string(),
            quantity,
            threshold: None,
        }
    }
}

/// Caller errors from position sizing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizingError {
    #[error("Unsupported trading pair: {0}")]
    UnknownSymbol(String),

    #[error("Current price must be positive, got {0}")]
    NonPositivePrice(Decimal),

    #[error("Available cash cannot be negative, got {0}")]
    NegativeCash(Decimal),

    #[error("Risk percentage must be within 0..=100, got {0}")]
    InvalidRiskPercent(Decimal),

    #[error("Position size calculation overflowed for {0}")]
    Overflow(String),
}

/// Rejected configuration snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Trading pair allowlist is empty")]
    EmptyAllowlist,

    #[error("{symbol}: {field} precision {digits} exceeds the supported maximum")]
    PrecisionTooLarge {
        symbol: String,
        field: &'static str,
        digits: u32,
    },

    #[error("{symbol}: {field} must be positive, got {value}")]
    NonPositiveLimit {
        symbol: String,
        field: &'static str,
        value: Decimal,
    },

    #[error("{symbol}: min_quantity {min_quantity} needs more than {digits} quantity digits")]
    MinQuantityTooFine {
        symbol: String,
        min_quantity: Decimal,
        digits: u32,
    },

    #[error("Risk config: {field} out of range, got {value}")]
    RiskOutOfRange { field: &'static str, value: Decimal },
}
