//! Engine configuration: risk parameters plus the symbol rule table.
//!
//! A configuration is an immutable snapshot. Runtime updates go through
//! [`SharedConfig::publish`], which swaps the whole snapshot at once.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use super::quantize::{quantize, MAX_DIGITS};
use super::{ConfigError, SymbolRuleTable};

/// Risk parameters. Only the stop-loss and take-profit percentages are used
/// by the engine; the ceilings are for the calling agent to enforce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Maximum position value in quote currency (monitored, not enforced)
    pub max_position_size: Decimal,

    /// Maximum loss per day in quote currency (monitored, not enforced)
    pub max_daily_loss: Decimal,

    /// Stop-loss distance below the reference price, in percent
    pub stop_loss_percent: Decimal,

    /// Take-profit distance above the reference price, in percent
    pub take_profit_percent: Decimal,

    /// Maximum concurrently open orders (exchange-side concern)
    pub max_open_orders: u32,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_position_size: dec!(10000.0),  // $10k per position
            max_daily_loss: dec!(1000.0),      // $1k per day
            stop_loss_percent: dec!(5.0),      // 5% below entry
            take_profit_percent: dec!(10.0),   // 10% above entry
            max_open_orders: 10,
        }
    }
}

impl RiskConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stop_loss_percent < Decimal::ZERO || self.stop_loss_percent >= dec!(100) {
            return Err(ConfigError::RiskOutOfRange {
                field: "stop_loss_percent",
                value: self.stop_loss_percent,
            });
        }
        if self.take_profit_percent < Decimal::ZERO {
            return Err(ConfigError::RiskOutOfRange {
                field: "take_profit_percent",
                value: self.take_profit_percent,
            });
        }
        if self.max_position_size < Decimal::ZERO {
            return Err(ConfigError::RiskOutOfRange {
                field: "max_position_size",
                value: self.max_position_size,
            });
        }
        if self.max_daily_loss < Decimal::ZERO {
            return Err(ConfigError::RiskOutOfRange {
                field: "max_daily_loss",
                value: self.max_daily_loss,
            });
        }
        Ok(())
    }
}

/// Complete configuration snapshot handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub risk: RiskConfig,

    #[serde(default)]
    pub symbols: SymbolRuleTable,

    /// Whether the agent targets the exchange testnet
    #[serde(default = "default_true")]
    pub testnet: bool,
}

fn default_true() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            risk: RiskConfig::default(),
            symbols: SymbolRuleTable::default(),
            testnet: true,
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file. Missing sections fall back to defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.validate()?;

        info!(
            path = %path.display(),
            pairs = config.symbols.trading_pairs().len(),
            "Loaded engine config"
        );
        Ok(config)
    }

    /// Overlay values from environment variables:
    /// - CRYPTO_STOP_LOSS_PERCENT
    /// - CRYPTO_TAKE_PROFIT_PERCENT
    /// - CRYPTO_TRADING_PAIRS (comma separated)
    /// - BINANCE_TESTNET ("true"/"false")
    pub fn apply_env(self) -> Result<Self> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    fn apply_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(v) = var("CRYPTO_STOP_LOSS_PERCENT") {
            self.risk.stop_loss_percent = Decimal::from_str(v.trim())
                .context("Invalid CRYPTO_STOP_LOSS_PERCENT")?;
        }
        if let Some(v) = var("CRYPTO_TAKE_PROFIT_PERCENT") {
            self.risk.take_profit_percent = Decimal::from_str(v.trim())
                .context("Invalid CRYPTO_TAKE_PROFIT_PERCENT")?;
        }
        if let Some(v) = var("CRYPTO_TRADING_PAIRS") {
            self.symbols = self.symbols.with_trading_pairs(v.split(','));
        }
        if let Some(v) = var("BINANCE_TESTNET") {
            self.testnet = v.trim().eq_ignore_ascii_case("true");
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject snapshots the engine cannot operate on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.risk.validate()?;

        if self.symbols.trading_pairs().is_empty() {
            return Err(ConfigError::EmptyAllowlist);
        }

        for (symbol, rule) in self.symbols.rules() {
            if rule.quantity_precision > MAX_DIGITS {
                return Err(ConfigError::PrecisionTooLarge {
                    symbol: symbol.clone(),
                    field: "quantity",
                    digits: rule.quantity_precision,
                });
            }
            if rule.price_precision > MAX_DIGITS {
                return Err(ConfigError::PrecisionTooLarge {
                    symbol: symbol.clone(),
                    field: "price",
                    digits: rule.price_precision,
                });
            }
            if rule.min_quantity <= Decimal::ZERO {
                return Err(ConfigError::NonPositiveLimit {
                    symbol: symbol.clone(),
                    field: "min_quantity",
                    value: rule.min_quantity,
                });
            }
            // A minimum the quantity grid cannot hit lets valid requests truncate below it.
            if quantize(rule.min_quantity, rule.quantity_precision) != rule.min_quantity {
                return Err(ConfigError::MinQuantityTooFine {
                    symbol: symbol.clone(),
                    min_quantity: rule.min_quantity,
                    digits: rule.quantity_precision,
                });
            }
            if rule.price_tick_size <= Decimal::ZERO {
                return Err(ConfigError::NonPositiveLimit {
                    symbol: symbol.clone(),
                    field: "price_tick_size",
                    value: rule.price_tick_size,
                });
            }
        }
        Ok(())
    }
}

/// Handle to the current configuration snapshot, shared across tasks.
#[derive(Debug, Clone)]
pub struct SharedConfig {
    current: Arc<RwLock<Arc<EngineConfig>>>,
}

impl SharedConfig {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            current: Arc::new(RwLock::new(Arc::new(config))),
        })
    }

    /// The snapshot in effect right now. Holders keep it even if a newer one
    /// is published.
    pub async fn snapshot(&self) -> Arc<EngineConfig> {
        self.current.read().await.clone()
    }

    /// Validate and atomically replace the snapshot.
    pub async fn publish(&self, config: EngineConfig) -> Result<(), ConfigError> {
        config.validate()?;
        *self.current.write().await = Arc::new(config);
        info!("Published new engine config snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SymbolRule;
    use std::collections::{BTreeMap, HashMap};

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.risk.stop_loss_percent, dec!(5));
        assert_eq!(config.risk.take_profit_percent, dec!(10));
        assert_eq!(config.symbols.trading_pairs().len(), 10);
        assert!(config.testnet);
    }

    #[test]
    fn test_rejects_bad_risk() {
        let config = EngineConfig {
            risk: RiskConfig {
                stop_loss_percent: dec!(100),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RiskOutOfRange { field: "stop_loss_percent", .. })
        ));

        let config = EngineConfig {
            risk: RiskConfig {
                take_profit_percent: dec!(-1),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_rules() {
        let mut rules = BTreeMap::new();
        rules.insert("BTCUSDT".to_string(), SymbolRule::new(6, 2, dec!(0), dec!(0.01)));
        let config = EngineConfig {
            symbols: SymbolRuleTable::new(["BTCUSDT"], rules),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveLimit { field: "min_quantity", .. })
        ));

        let mut rules = BTreeMap::new();
        rules.insert("BTCUSDT".to_string(), SymbolRule::new(29, 2, dec!(1), dec!(0.01)));
        let config = EngineConfig {
            symbols: SymbolRuleTable::new(["BTCUSDT"], rules),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::PrecisionTooLarge { .. })));
    }

    #[test]
    fn test_rejects_min_quantity_finer_than_precision() {
        let mut rules = BTreeMap::new();
        rules.insert("SOLUSDT".to_string(), SymbolRule::new(0, 2, dec!(0.5), dec!(0.01)));
        let config = EngineConfig {
            symbols: SymbolRuleTable::new(["SOLUSDT"], rules),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::MinQuantityTooFine {
                symbol: "SOLUSDT".to_string(),
                min_quantity: dec!(0.5),
                digits: 0,
            })
        );

        // Trailing zeros beyond the precision are fine
        let mut rules = BTreeMap::new();
        rules.insert("SOLUSDT".to_string(), SymbolRule::new(1, 2, dec!(0.50), dec!(0.01)));
        let config = EngineConfig {
            symbols: SymbolRuleTable::new(["SOLUSDT"], rules),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_allowlist() {
        let config = EngineConfig {
            symbols: SymbolRuleTable::default().with_trading_pairs(Vec::<String>::new()),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyAllowlist));
    }

    #[test]
    fn test_env_overlay() {
        let vars: HashMap<&str, &str> = [
            ("CRYPTO_STOP_LOSS_PERCENT", "3.5"),
            ("CRYPTO_TAKE_PROFIT_PERCENT", "7"),
            ("CRYPTO_TRADING_PAIRS", "btcusdt, solusdt"),
            ("BINANCE_TESTNET", "false"),
        ]
        .into_iter()
        .collect();

        let config = EngineConfig::default()
            .apply_vars(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.risk.stop_loss_percent, dec!(3.5));
        assert_eq!(config.risk.take_profit_percent, dec!(7));
        assert_eq!(
            config.symbols.trading_pairs(),
            &["BTCUSDT".to_string(), "SOLUSDT".to_string()]
        );
        assert!(!config.testnet);
    }

    #[test]
    fn test_env_overlay_rejects_garbage() {
        let result = EngineConfig::default().apply_vars(|k| {
            (k == "CRYPTO_STOP_LOSS_PERCENT").then(|| "five".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "risk": {
            "max_position_size": "5000",
            "max_daily_loss": "500",
            "stop_loss_percent": "2",
            "take_profit_percent": "4",
            "max_open_orders": 3
        } }"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.risk.stop_loss_percent, dec!(2));
        assert_eq!(config.symbols, SymbolRuleTable::default());
        assert!(config.testnet);
    }

    #[test]
    fn test_from_json_file() {
        let path = std::env::temp_dir().join(format!(
            "crypto_order_guard_config_{}.json",
            std::process::id()
        ));
        let config = EngineConfig {
            testnet: false,
            ..Default::default()
        };
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = EngineConfig::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn test_shared_config_swaps_whole_snapshot() {
        let shared = SharedConfig::new(EngineConfig::default()).unwrap();
        let before = shared.snapshot().await;

        let updated = EngineConfig {
            risk: RiskConfig {
                stop_loss_percent: dec!(2),
                ..Default::default()
            },
            ..Default::default()
        };
        shared.publish(updated).await.unwrap();

        // Old holders are unaffected, new readers see the update
        assert_eq!(before.risk.stop_loss_percent, dec!(5));
        assert_eq!(shared.snapshot().await.risk.stop_loss_percent, dec!(2));
    }

    #[tokio::test]
    async fn test_shared_config_rejects_invalid_publish() {
        let shared = SharedConfig::new(EngineConfig::default()).unwrap();
        let bad = EngineConfig {
            risk: RiskConfig {
                stop_loss_percent: dec!(-1),
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(shared.publish(bad).await.is_err());
        assert_eq!(shared.snapshot().await.risk.stop_loss_percent, dec!(5));
    }
}
