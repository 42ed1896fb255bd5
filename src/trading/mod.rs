//! Trading core: symbol rules, quantization, position sizing, order validation.

mod config;
mod engine;
mod error;
mod position_sizer;
mod quantize;
mod rules;

pub use config::{EngineConfig, RiskConfig, SharedConfig};
pub use engine::OrderEngine;
pub use error::{ConfigError, SizingError, ValidationError, ValidationErrorKind};
pub use position_sizer::{PositionSizer, DEFAULT_RISK_PERCENT};
pub use quantize::{quantize, MAX_DIGITS};
pub use rules::SymbolRuleTable;
