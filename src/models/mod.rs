//! Data models for trade requests, symbol rules, orders, and market status.

mod market;
mod order;
mod symbol;
mod trade;

pub use market::{MarketInfo, TradingStatus};
pub use order::{OrderDescriptor, ProtectiveLevels};
pub use symbol::{canonical_symbol, Precision, SymbolRule};
pub use trade::{TradeAction, TradeRequest};
