//! In-memory paper venue: fills every order immediately at its limit price.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::{canonical_symbol, OrderDescriptor};

use super::{ExchangeClient, OrderAck, OrderSide};

/// Quote asset every supported pair settles in.
const QUOTE_ASSET: &str = "USDT";

/// Simulated exchange with caller-seeded prices and balances.
#[derive(Debug, Clone, Default)]
pub struct PaperExchange {
    prices: Arc<RwLock<HashMap<String, Decimal>>>,
    balances: Arc<RwLock<HashMap<String, Decimal>>>,
    fills: Arc<RwLock<Vec<OrderAck>>>,
    next_order_id: Arc<AtomicU64>,
}

impl PaperExchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_price(&self, symbol: &str, price: Decimal) {
        self.prices.write().await.insert(canonical_symbol(symbol), price);
    }

    pub async fn set_balance(&self, asset: &str, amount: Decimal) {
        self.balances.write().await.insert(asset.to_uppercase(), amount);
    }

    /// All acknowledged orders, oldest first.
    pub async fn fills(&self) -> Vec<OrderAck> {
        self.fills.read().await.clone()
    }

    fn base_asset(symbol: &str) -> Result<&str> {
        symbol
            .strip_suffix(QUOTE_ASSET)
            .filter(|base| !base.is_empty())
            .ok_or_else(|| anyhow!("Paper exchange only supports {QUOTE_ASSET} pairs, got {symbol}"))
    }
}

#[async_trait]
impl ExchangeClient for PaperExchange {
    async fn current_price(&self, symbol: &str) -> Result<Decimal> {
        let symbol = canonical_symbol(symbol);
        self.prices
            .read()
            .await
            .get(&symbol)
            .copied()
            .ok_or_else(|| anyhow!("No price for {symbol}"))
    }

    async fn available_balance(&self, asset: &str) -> Result<Decimal> {
        Ok(self
            .balances
            .read()
            .await
            .get(&asset.to_uppercase())
            .copied()
            .unwrap_or(Decimal::ZERO))
    }

    async fn submit_order(&self, order: &OrderDescriptor) -> Result<OrderAck> {
        let Some(side) = OrderSide::from_action(order.action) else {
            bail!("Refusing to submit {} order {}", order.action, order.trade_id);
        };
        let base = Self::base_asset(&order.symbol)?;

        {
            let mut balances = self.balances.write().await;
            let quote_free = balances.get(QUOTE_ASSET).copied().unwrap_or(Decimal::ZERO);
            let base_free = balances.get(base).copied().unwrap_or(Decimal::ZERO);

            match side {
                OrderSide::Buy => {
                    if quote_free < order.notional_value {
                        bail!(
                            "Insufficient {QUOTE_ASSET}: need {}, have {}",
                            order.notional_value,
                            quote_free
                        );
                    }
                    let base_after = base_free
                        .checked_add(order.quantity)
                        .ok_or_else(|| anyhow!("{base} balance overflowed"))?;
                    balances.insert(QUOTE_ASSET.to_string(), quote_free - order.notional_value);
                    balances.insert(base.to_string(), base_after);
                }
                OrderSide::Sell => {
                    if base_free < order.quantity {
                        bail!("Insufficient {base}: need {}, have {}", order.quantity, base_free);
                    }
                    let quote_after = quote_free
                        .checked_add(order.notional_value)
                        .ok_or_else(|| anyhow!("{QUOTE_ASSET} balance overflowed"))?;
                    balances.insert(base.to_string(), base_free - order.quantity);
                    balances.insert(QUOTE_ASSET.to_string(), quote_after);
                }
            }
        }

        let ack = OrderAck {
            order_id: self.next_order_id.fetch_add(1, Ordering::Relaxed) + 1,
            client_order_id: order.trade_id.clone(),
            symbol: order.symbol.clone(),
            side,
            price: order.price,
            orig_qty: order.quantity,
            executed_qty: order.quantity,
            status: "FILLED".to_string(),
            transact_time: Utc::now(),
        };

        debug!(order_id = ack.order_id, trade_id = %ack.client_order_id, "Paper fill recorded");
        info!(
            symbol = %ack.symbol,
            side = ?ack.side,
            qty = %ack.executed_qty,
            price = %ack.price,
            "Paper order filled"
        );

        self.fills.write().await.push(ack.clone());
        Ok(ack)
    }
}
