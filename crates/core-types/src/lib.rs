// In crates/core-types/src/lib.rs

pub mod error;
pub mod period;
pub mod types;

// Re-export the most important types for easy access from other crates.
pub use error::{Error, Result};
pub use period::Period;
pub use types::{
    CloseTrade, Direction, NewTrade, TradeRecord, TradeStatus, TradeUpdate, realized_pnl,
    risk_reward_ratio,
};
