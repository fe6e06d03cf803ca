// In crates/database/src/types.rs

use chrono::{DateTime, Utc};
use core_types::{TradeRecord, TradeStatus};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::Result;

/// Query options for listing a user's trades. Results are newest-first.
#[derive(Debug, Clone, Default)]
pub struct TradeFilter {
    pub status: Option<TradeStatus>,
    pub symbol: Option<String>,
    pub strategy: Option<String>,
    /// Inclusive lower bound on `created_at`.
    pub created_since: Option<DateTime<Utc>>,
    /// Inclusive lower bound on `exit_time`; excludes trades that never exited.
    pub exited_since: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
    pub offset: u32,
}

impl TradeFilter {
    /// Trades created inside a window, any status.
    pub fn created_since(since: DateTime<Utc>) -> Self {
        Self { created_since: Some(since), ..Default::default() }
    }

    /// Closed trades that exited inside a window.
    pub fn exited_since(since: DateTime<Utc>) -> Self {
        Self {
            status: Some(TradeStatus::Closed),
            exited_since: Some(since),
            ..Default::default()
        }
    }

    /// Applies every predicate except paging.
    pub fn matches(&self, trade: &TradeRecord) -> bool {
        self.status.is_none_or(|status| trade.status == status)
            && self.symbol.as_ref().is_none_or(|symbol| &trade.symbol == symbol)
            && self
                .strategy
                .as_ref()
                .is_none_or(|strategy| trade.strategy.as_ref() == Some(strategy))
            && self.created_since.is_none_or(|since| trade.created_at >= since)
            && self
                .exited_since
                .is_none_or(|since| trade.exit_time.is_some_and(|exit| exit >= since))
    }
}

/// A raw row of the `trades` table, before enum columns are parsed.
#[derive(Debug, sqlx::FromRow)]
pub struct TradeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub symbol: String,
    pub direction: String,
    pub entry_price: Decimal,
    pub exit_price: Option<Decimal>,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub position_size: Decimal,
    pub risk_amount: Decimal,
    pub risk_reward_ratio: Option<Decimal>,
    pub strategy: Option<String>,
    pub market_structure: Option<String>,
    pub session: Option<String>,
    pub entry_reason: Option<String>,
    pub exit_reason: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub pnl: Option<Decimal>,
    pub pnl_percentage: Option<Decimal>,
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TradeRow {
    pub fn into_record(self) -> Result<TradeRecord> {
        Ok(TradeRecord {
            id: self.id,
            user_id: self.user_id,
            symbol: self.symbol,
            direction: self.direction.parse()?,
            entry_price: self.entry_price,
            exit_price: self.exit_price,
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
            position_size: self.position_size,
            risk_amount: self.risk_amount,
            risk_reward_ratio: self.risk_reward_ratio,
            strategy: self.strategy,
            market_structure: self.market_structure,
            session: self.session,
            entry_reason: self.entry_reason,
            exit_reason: self.exit_reason,
            notes: self.notes,
            status: self.status.parse()?,
            pnl: self.pnl,
            pnl_percentage: self.pnl_percentage,
            entry_time: self.entry_time,
            exit_time: self.exit_time,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
