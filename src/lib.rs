//! Trade sizing and order validation for a Binance crypto trading agent.
//!
//! Every order the agent proposes passes through [`trading::OrderEngine`]:
//! symbols are checked against an allowlist, quantities and prices are
//! truncated to the pair's precision, and stop-loss / take-profit levels are
//! attached before anything reaches an exchange.

pub mod exchange;
pub mod models;
pub mod trading;
