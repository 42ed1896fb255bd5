//! Crypto order guard CLI
//!
//! Operator front-end to the sizing and validation engine: check pairs,
//! size positions, build orders and optionally fill them on a paper venue.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crypto_order_guard::exchange::{ExchangeClient, PaperExchange};
use crypto_order_guard::models::{canonical_symbol, TradeAction, TradeRequest, TradingStatus};
use crypto_order_guard::trading::{EngineConfig, OrderEngine, DEFAULT_RISK_PERCENT};

/// Sizing and validation front-end for the crypto trading agent.
#[derive(Parser)]
#[command(name = "crypto-guard")]
#[command(about = "Size and validate crypto orders before they reach the exchange", long_about = None)]
struct Cli {
    /// JSON config file (defaults are used when omitted)
    #[arg(short, long, env = "CRYPTO_GUARD_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG overrides
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a quantity of a pair may be ordered
    Validate {
        /// Trading pair, e.g. BTCUSDT
        symbol: String,

        #[arg(value_parser = parse_decimal)]
        quantity: Decimal,
    },

    /// Compute a risk-based position size
    Size {
        /// Trading pair, e.g. BTCUSDT
        symbol: String,

        /// Available cash in USDT
        #[arg(long, value_parser = parse_decimal)]
        cash: Decimal,

        /// Current price of the pair
        #[arg(long, value_parser = parse_decimal)]
        price: Decimal,

        /// Share of cash to commit, in percent
        #[arg(long, value_parser = parse_decimal, default_value_t = DEFAULT_RISK_PERCENT)]
        risk: Decimal,
    },

    /// Build an order descriptor
    Order {
        /// BUY, SELL or HOLD
        #[arg(value_parser = parse_action)]
        action: TradeAction,

        /// Trading pair, e.g. BTCUSDT
        symbol: String,

        #[arg(value_parser = parse_decimal)]
        quantity: Decimal,

        #[arg(value_parser = parse_decimal)]
        price: Decimal,

        /// Free-form reason recorded on the order
        #[arg(short, long)]
        reason: Option<String>,

        /// Fill the order on a paper exchange
        #[arg(long)]
        submit: bool,

        /// Paper exchange USDT balance
        #[arg(long, value_parser = parse_decimal, default_value = "10000")]
        paper_cash: Decimal,

        /// Paper exchange balance of the base asset
        #[arg(long, value_parser = parse_decimal, default_value = "0")]
        paper_holding: Decimal,
    },

    /// Show trading rules for a pair
    Info {
        /// Trading pair, e.g. BTCUSDT
        symbol: String,
    },

    /// Show effective configuration
    Config,

    /// Show trading status
    Status,
}

fn parse_decimal(s: &str) -> Result<Decimal, String> {
    Decimal::from_str(s.trim()).map_err(|e| format!("invalid decimal '{s}': {e}"))
}

fn parse_action(s: &str) -> Result<TradeAction, String> {
    TradeAction::from_str(s)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging; RUST_LOG takes precedence over --log-level
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    }
    .apply_env()
    .context("Failed to apply environment overrides")?;

    let engine = OrderEngine::from_config(&config);

    match cli.command {
        Commands::Validate { symbol, quantity } => match engine.validate_pair(&symbol, quantity) {
            Ok(qty) => println!("OK: {} {} may be ordered", qty, canonical_symbol(&symbol)),
            Err(e) => println!("REJECTED ({:?}): {}", e.kind, e),
        },

        Commands::Size {
            symbol,
            cash,
            price,
            risk,
        } => {
            let size = engine.compute_position_size(&symbol, cash, price, risk)?;
            println!(
                "{} size at {}% of {} USDT, price {}: {}",
                canonical_symbol(&symbol),
                risk,
                cash,
                price,
                size
            );
            if let Err(e) = engine.validate_pair(&symbol, size) {
                println!("Note: sized quantity would be rejected: {}", e);
            }
        }

        Commands::Order {
            action,
            symbol,
            quantity,
            price,
            reason,
            submit,
            paper_cash,
            paper_holding,
        } => {
            let mut request = TradeRequest::new(action, symbol, quantity, price);
            if let Some(reason) = reason {
                request = request.with_reason(reason);
            }

            let order = match engine.build_order(&request, &config.risk) {
                Ok(order) => order,
                Err(e) => {
                    println!("REJECTED ({:?}): {}", e.kind, e);
                    return Ok(());
                }
            };
            println!("\n{}", order);

            if submit {
                let exchange = PaperExchange::new();
                exchange.set_balance("USDT", paper_cash).await;
                exchange
                    .set_balance(order.symbol.trim_end_matches("USDT"), paper_holding)
                    .await;

                info!(trade_id = %order.trade_id, "Submitting to paper exchange");
                let ack = exchange.submit_order(&order).await?;

                println!("\n--- Paper Fill ---");
                println!("Order ID:     {}", ack.order_id);
                println!("Client ID:    {}", ack.client_order_id);
                println!("Status:       {}", ack.status);
                println!("Executed:     {} @ {}", ack.executed_qty, ack.price);
                println!("USDT balance: {}", exchange.available_balance("USDT").await?);
            }
        }

        Commands::Info { symbol } => match config.symbols.market_info(&symbol) {
            Some(market) => {
                println!("\n=== {} ===", market.symbol);
                println!("Quantity precision: {}", market.precision.quantity);
                println!("Price precision:    {}", market.precision.price);
                println!("Min quantity:       {}", market.min_quantity);
                println!("Price tick size:    {}", market.price_tick_size);
                println!("Active:             {}", if market.is_active { "yes" } else { "no" });
                if !config.symbols.has_explicit_rule(&market.symbol) {
                    println!("(no explicit rule; conservative default applies)");
                }
            }
            None => println!("Unsupported trading pair: {}", canonical_symbol(&symbol)),
        },

        Commands::Config => {
            let risk = &config.risk;

            println!("\n=== Risk Configuration ===\n");
            println!("  Max Position Size:    ${}", risk.max_position_size);
            println!("  Max Daily Loss:       ${}", risk.max_daily_loss);
            println!("  Stop Loss:            {}%", risk.stop_loss_percent);
            println!("  Take Profit:          {}%", risk.take_profit_percent);
            println!("  Max Open Orders:      {}", risk.max_open_orders);
            println!("  Testnet:              {}", config.testnet);

            println!("\n=== Symbol Rules ===\n");
            println!(
                "{:<12} {:>8} {:>8} {:>14} {:>12}",
                "PAIR", "QTY DP", "PX DP", "MIN QTY", "TICK"
            );
            println!("{}", "-".repeat(58));
            for pair in config.symbols.trading_pairs() {
                if let Some(rule) = config.symbols.lookup(pair) {
                    println!(
                        "{:<12} {:>8} {:>8} {:>14} {:>12}",
                        pair,
                        rule.quantity_precision,
                        rule.price_precision,
                        rule.min_quantity,
                        rule.price_tick_size
                    );
                }
            }
        }

        Commands::Status => {
            let status =
                TradingStatus::new(config.symbols.trading_pairs().to_vec(), config.testnet);
            println!("\n{}", status);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_order() {
        let cli = Cli::try_parse_from([
            "crypto-guard",
            "order",
            "buy",
            "btcusdt",
            "0.0123456789",
            "50000.129",
            "--submit",
        ])
        .unwrap();

        match cli.command {
            Commands::Order {
                action,
                quantity,
                submit,
                paper_cash,
                ..
            } => {
                assert_eq!(action, TradeAction::Buy);
                assert_eq!(quantity, Decimal::from_str("0.0123456789").unwrap());
                assert!(submit);
                assert_eq!(paper_cash, Decimal::from(10000));
            }
            _ => panic!("expected order command"),
        }
    }

    #[test]
    fn test_cli_rejects_bad_decimal() {
        let result = Cli::try_parse_from(["crypto-guard", "validate", "BTCUSDT", "abc"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_size_default_risk() {
        let cli = Cli::try_parse_from([
            "crypto-guard",
            "size",
            "BTCUSDT",
            "--cash",
            "10000",
            "--price",
            "50000",
        ])
        .unwrap();

        match cli.command {
            Commands::Size { risk, .. } => assert_eq!(risk, DEFAULT_RISK_PERCENT),
            _ => panic!("expected size command"),
        }
    }
}
