//! Symbol rule table: trading-pair allowlist plus per-pair precision rules.
//!
//! Lookup is two-tier:
//! - a pair outside the allowlist is not found, and the engine rejects it
//! - an allowlisted pair without an explicit rule gets
//!   [`SymbolRule::conservative_default`]

use std::collections::BTreeMap;

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::{canonical_symbol, MarketInfo, SymbolRule};

/// Immutable lookup table of trading constraints, keyed by upper-case symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRuleTable", into = "RawRuleTable")]
pub struct SymbolRuleTable {
    trading_pairs: Vec<String>,
    rules: BTreeMap<String, SymbolRule>,
}

/// On-disk shape; keys may arrive in any case.
#[derive(Serialize, Deserialize)]
struct RawRuleTable {
    trading_pairs: Vec<String>,
    #[serde(default)]
    rules: BTreeMap<String, SymbolRule>,
}

impl From<RawRuleTable> for SymbolRuleTable {
    fn from(raw: RawRuleTable) -> Self {
        Self::new(raw.trading_pairs, raw.rules)
    }
}

impl From<SymbolRuleTable> for RawRuleTable {
    fn from(table: SymbolRuleTable) -> Self {
        Self {
            trading_pairs: table.trading_pairs,
            rules: table.rules,
        }
    }
}

impl SymbolRuleTable {
    /// Build a table, canonicalizing every key. Duplicate pairs are dropped.
    pub fn new<I, S>(trading_pairs: I, rules: BTreeMap<String, SymbolRule>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut pairs: Vec<String> = Vec::new();
        for pair in trading_pairs {
            let pair = canonical_symbol(pair.as_ref());
            if !pair.is_empty() && !pairs.contains(&pair) {
                pairs.push(pair);
            }
        }

        let rules = rules
            .into_iter()
            .map(|(symbol, rule)| (canonical_symbol(&symbol), rule))
            .collect();

        Self {
            trading_pairs: pairs,
            rules,
        }
    }

    /// Effective rule for `symbol`, or `None` when it is not allowlisted.
    pub fn lookup(&self, symbol: &str) -> Option<SymbolRule> {
        let key = canonical_symbol(symbol);
        if !self.is_allowed(&key) {
            return None;
        }
        Some(
            self.rules
                .get(&key)
                .copied()
                .unwrap_or_else(SymbolRule::conservative_default),
        )
    }

    /// Whether `symbol` is on the trading-pair allowlist.
    pub fn is_allowed(&self, symbol: &str) -> bool {
        let key = canonical_symbol(symbol);
        self.trading_pairs.iter().any(|p| *p == key)
    }

    /// Whether `symbol` has its own rule rather than the default.
    pub fn has_explicit_rule(&self, symbol: &str) -> bool {
        self.rules.contains_key(&canonical_symbol(symbol))
    }

    pub fn trading_pairs(&self) -> &[String] {
        &self.trading_pairs
    }

    /// Explicit rules, including any for pairs outside the allowlist.
    pub fn rules(&self) -> impl Iterator<Item = (&String, &SymbolRule)> {
        self.rules.iter()
    }

    /// Replace the allowlist, keeping the rules.
    pub fn with_trading_pairs<I, S>(self, trading_pairs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(trading_pairs, self.rules)
    }

    /// Market info for an allowlisted pair.
    pub fn market_info(&self, symbol: &str) -> Option<MarketInfo> {
        let rule = self.lookup(symbol)?;
        Some(MarketInfo {
            symbol: canonical_symbol(symbol),
            precision: rule.precision(),
            min_quantity: rule.min_quantity,
            price_tick_size: rule.price_tick_size,
            is_active: true,
        })
    }
}

impl Default for SymbolRuleTable {
    fn default() -> Self {
        let rules: BTreeMap<String, SymbolRule> = [
            ("BTCUSDT", SymbolRule::new(6, 2, dec!(0.000001), dec!(0.01))),
            ("ETHUSDT", SymbolRule::new(5, 2, dec!(0.00001), dec!(0.01))),
            ("BNBUSDT", SymbolRule::new(4, 2, dec!(0.0001), dec!(0.01))),
            ("ADAUSDT", SymbolRule::new(0, 4, dec!(1.0), dec!(0.0001))),
            ("DOTUSDT", SymbolRule::new(3, 3, dec!(0.001), dec!(0.001))),
            ("XRPUSDT", SymbolRule::new(1, 4, dec!(0.1), dec!(0.0001))),
            ("LTCUSDT", SymbolRule::new(3, 2, dec!(0.001), dec!(0.01))),
            ("LINKUSDT", SymbolRule::new(2, 3, dec!(0.01), dec!(0.001))),
            ("BCHUSDT", SymbolRule::new(3, 2, dec!(0.001), dec!(0.01))),
            ("XLMUSDT", SymbolRule::new(1, 5, dec!(0.1), dec!(0.00001))),
        ]
        .into_iter()
        .map(|(symbol, rule)| (symbol.to_string(), rule))
        .collect();

        let pairs: Vec<String> = [
            "BTCUSDT", "ETHUSDT", "BNBUSDT", "ADAUSDT", "DOTUSDT",
            "XRPUSDT", "LTCUSDT", "LINKUSDT", "BCHUSDT", "XLMUSDT",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        Self::new(pairs, rules)
    }
}
