// In crates/core-types/src/types.rs

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Represents the direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "long" => Ok(Direction::Long),
            "short" => Ok(Direction::Short),
            other => Err(Error::InvalidDirection(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Open,
    Closed,
}

impl TradeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Open => "open",
            TradeStatus::Closed => "closed",
        }
    }
}

impl FromStr for TradeStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "open" => Ok(TradeStatus::Open),
            "closed" => Ok(TradeStatus::Closed),
            other => Err(Error::InvalidStatus(other.to_string())),
        }
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single journal entry, from entry to (optional) exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub symbol: String,
    pub direction: Direction,
    pub entry_price: Decimal,
    pub exit_price: Option<Decimal>,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub position_size: Decimal,
    pub risk_amount: Decimal,
    /// `None` when entry and stop loss coincide.
    pub risk_reward_ratio: Option<Decimal>,
    pub strategy: Option<String>,
    pub market_structure: Option<String>,
    pub session: Option<String>,
    pub entry_reason: Option<String>,
    pub exit_reason: Option<String>,
    pub notes: Option<String>,
    pub status: TradeStatus,
    pub pnl: Option<Decimal>,
    pub pnl_percentage: Option<Decimal>,
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The request body for logging a new trade.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTrade {
    pub symbol: String,
    pub direction: Direction,
    pub entry_price: Decimal,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub position_size: Decimal,
    pub risk_amount: Decimal,
    pub strategy: Option<String>,
    pub market_structure: Option<String>,
    pub session: Option<String>,
    pub entry_reason: Option<String>,
    pub notes: Option<String>,
}

impl NewTrade {
    /// Rejects records that would make the derived fields meaningless.
    pub fn validate(&self) -> Result<()> {
        validate_levels(
            &self.symbol,
            self.entry_price,
            self.stop_loss,
            self.take_profit,
            self.position_size,
            self.risk_amount,
        )
    }
}

fn validate_levels(
    symbol: &str,
    entry_price: Decimal,
    stop_loss: Decimal,
    take_profit: Decimal,
    position_size: Decimal,
    risk_amount: Decimal,
) -> Result<()> {
    if symbol.trim().is_empty() {
        return Err(Error::InvalidTrade("symbol must not be empty".into()));
    }
    if entry_price <= dec!(0) {
        return Err(Error::InvalidTrade("entry_price must be positive".into()));
    }
    if position_size <= dec!(0) {
        return Err(Error::InvalidTrade("position_size must be positive".into()));
    }
    if stop_loss < dec!(0) || take_profit < dec!(0) {
        return Err(Error::InvalidTrade(
            "stop_loss and take_profit must not be negative".into(),
        ));
    }
    if risk_amount < dec!(0) {
        return Err(Error::InvalidTrade("risk_amount must not be negative".into()));
    }
    Ok(())
}

/// A partial edit of an open or closed trade. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TradeUpdate {
    pub symbol: Option<String>,
    pub direction: Option<Direction>,
    pub entry_price: Option<Decimal>,
    pub stop_loss: Option<Decimal>,
    pub take_profit: Option<Decimal>,
    pub position_size: Option<Decimal>,
    pub risk_amount: Option<Decimal>,
    pub strategy: Option<String>,
    pub market_structure: Option<String>,
    pub session: Option<String>,
    pub entry_reason: Option<String>,
    pub notes: Option<String>,
}

/// The request body for closing a trade at a given exit price.
#[derive(Debug, Clone, Deserialize)]
pub struct CloseTrade {
    pub exit_price: Decimal,
    pub exit_reason: Option<String>,
    pub notes: Option<String>,
}

/// `|take_profit - entry| / |entry - stop_loss|`, or `None` for a zero risk distance
/// or a quotient outside the `Decimal` range.
pub fn risk_reward_ratio(
    entry: Decimal,
    stop_loss: Decimal,
    take_profit: Decimal,
) -> Option<Decimal> {
    let risk = entry.checked_sub(stop_loss)?.abs();
    let reward = take_profit.checked_sub(entry)?.abs();
    reward.checked_div(risk)
}

/// Signed profit of a position closed at `exit`.
///
/// Fails when the result does not fit in a `Decimal`.
pub fn realized_pnl(
    direction: Direction,
    entry: Decimal,
    exit: Decimal,
    size: Decimal,
) -> Result<Decimal> {
    let move_per_unit = match direction {
        Direction::Long => exit.checked_sub(entry),
        Direction::Short => entry.checked_sub(exit),
    };
    move_per_unit
        .and_then(|delta| delta.checked_mul(size))
        .ok_or_else(|| Error::InvalidTrade("realized P&L is out of range".into()))
}

impl TradeRecord {
    /// Opens a new journal entry for `user_id` at `now`.
    pub fn open(user_id: Uuid, new: NewTrade, now: DateTime<Utc>) -> Result<Self> {
        new.validate()?;
        let risk_reward_ratio = risk_reward_ratio(new.entry_price, new.stop_loss, new.take_profit);

        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            symbol: new.symbol,
            direction: new.direction,
            entry_price: new.entry_price,
            exit_price: None,
            stop_loss: new.stop_loss,
            take_profit: new.take_profit,
            position_size: new.position_size,
            risk_amount: new.risk_amount,
            risk_reward_ratio,
            strategy: new.strategy,
            market_structure: new.market_structure,
            session: new.session,
            entry_reason: new.entry_reason,
            exit_reason: None,
            notes: new.notes,
            status: TradeStatus::Open,
            pnl: None,
            pnl_percentage: None,
            entry_time: now,
            exit_time: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.status == TradeStatus::Closed
    }

    /// Applies a partial edit, re-deriving the risk-reward ratio if a price level moved.
    ///
    /// The edited record must satisfy the same rules as a new trade. Closed trades
    /// have their P&L re-realized against the stored exit price. On error the
    /// record is left unchanged.
    pub fn apply_update(&mut self, update: TradeUpdate, now: DateTime<Utc>) -> Result<()> {
        let levels_changed = update.entry_price.is_some()
            || update.stop_loss.is_some()
            || update.take_profit.is_some();

        let mut next = self.clone();
        if let Some(symbol) = update.symbol {
            next.symbol = symbol;
        }
        if let Some(direction) = update.direction {
            next.direction = direction;
        }
        if let Some(entry_price) = update.entry_price {
            next.entry_price = entry_price;
        }
        if let Some(stop_loss) = update.stop_loss {
            next.stop_loss = stop_loss;
        }
        if let Some(take_profit) = update.take_profit {
            next.take_profit = take_profit;
        }
        if let Some(position_size) = update.position_size {
            next.position_size = position_size;
        }
        if let Some(risk_amount) = update.risk_amount {
            next.risk_amount = risk_amount;
        }
        if update.strategy.is_some() {
            next.strategy = update.strategy;
        }
        if update.market_structure.is_some() {
            next.market_structure = update.market_structure;
        }
        if update.session.is_some() {
            next.session = update.session;
        }
        if update.entry_reason.is_some() {
            next.entry_reason = update.entry_reason;
        }
        if update.notes.is_some() {
            next.notes = update.notes;
        }

        validate_levels(
            &next.symbol,
            next.entry_price,
            next.stop_loss,
            next.take_profit,
            next.position_size,
            next.risk_amount,
        )?;
        if levels_changed {
            next.risk_reward_ratio =
                risk_reward_ratio(next.entry_price, next.stop_loss, next.take_profit);
        }
        if let Some(exit_price) = next.exit_price.filter(|_| next.is_closed()) {
            next.realize(exit_price)?;
        }
        next.updated_at = now;

        *self = next;
        Ok(())
    }

    /// Closes the position at `close.exit_price` and realizes its P&L.
    pub fn close(&mut self, close: CloseTrade, now: DateTime<Utc>) -> Result<()> {
        if self.is_closed() {
            return Err(Error::AlreadyClosed(self.id));
        }
        if close.exit_price < dec!(0) {
            return Err(Error::InvalidTrade("exit_price must not be negative".into()));
        }

        self.realize(close.exit_price)?;
        self.exit_price = Some(close.exit_price);
        self.exit_reason = close.exit_reason;
        if close.notes.is_some() {
            self.notes = close.notes;
        }
        self.status = TradeStatus::Closed;
        self.exit_time = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Sets `pnl` and `pnl_percentage` for an exit at `exit_price`. Leaves both
    /// untouched on error.
    fn realize(&mut self, exit_price: Decimal) -> Result<()> {
        let pnl = realized_pnl(self.direction, self.entry_price, exit_price, self.position_size)?;
        self.pnl_percentage = pnl
            .checked_div(self.risk_amount)
            .and_then(|ratio| ratio.checked_mul(dec!(100)));
        self.pnl = Some(pnl);
        Ok(())
    }
}
