// In crates/database/src/memory.rs

use async_trait::async_trait;
use core_types::TradeRecord;
use std::cmp::Reverse;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::store::TradeStore;
use crate::types::TradeFilter;
use crate::Result;

/// A process-local `TradeStore` for tests and database-less runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    trades: Mutex<Vec<TradeRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn trades(&self) -> MutexGuard<'_, Vec<TradeRecord>> {
        self.trades.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl TradeStore for MemoryStore {
    async fn insert_trade(&self, trade: &TradeRecord) -> Result<()> {
        self.trades().push(trade.clone());
        Ok(())
    }

    async fn get_trade(&self, user_id: Uuid, id: Uuid) -> Result<Option<TradeRecord>> {
        Ok(self
            .trades()
            .iter()
            .find(|t| t.id == id && t.user_id == user_id)
            .cloned())
    }

    async fn list_trades(&self, user_id: Uuid, filter: &TradeFilter) -> Result<Vec<TradeRecord>> {
        let mut matching: Vec<TradeRecord> = self
            .trades()
            .iter()
            .filter(|t| t.user_id == user_id && filter.matches(t))
            .cloned()
            .collect();
        matching.sort_by_key(|t| Reverse(t.created_at));

        let limit = filter.limit.map_or(usize::MAX, |l| l as usize);
        Ok(matching
            .into_iter()
            .skip(filter.offset as usize)
            .take(limit)
            .collect())
    }

    async fn save_trade(&self, trade: &TradeRecord) -> Result<bool> {
        let mut trades = self.trades();
        match trades
            .iter_mut()
            .find(|t| t.id == trade.id && t.user_id == trade.user_id)
        {
            Some(stored) => {
                *stored = trade.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_trade(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let mut trades = self.trades();
        let before = trades.len();
        trades.retain(|t| !(t.id == id && t.user_id == user_id));
        Ok(trades.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use core_types::{CloseTrade, Direction, NewTrade, TradeStatus};
    use rust_decimal_macros::dec;

    fn new_trade(symbol: &str, strategy: &str) -> NewTrade {
        NewTrade {
            symbol: symbol.into(),
            direction: Direction::Short,
            entry_price: dec!(150.20),
            stop_loss: dec!(150.50),
            take_profit: dec!(149.60),
            position_size: dec!(100),
            risk_amount: dec!(30),
            strategy: Some(strategy.into()),
            market_structure: Some("bearish".into()),
            session: Some("new_york".into()),
            entry_reason: None,
            notes: None,
        }
    }

    async fn seeded(user: Uuid) -> (MemoryStore, Vec<TradeRecord>) {
        let store = MemoryStore::new();
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut trades = Vec::new();
        for (day, (symbol, strategy)) in [("USDJPY", "M"), ("EURUSD", "W"), ("USDJPY", "W")]
            .into_iter()
            .enumerate()
        {
            let opened_at = start + Duration::days(day as i64);
            let trade = TradeRecord::open(user, new_trade(symbol, strategy), opened_at).unwrap();
            store.insert_trade(&trade).await.unwrap();
            trades.push(trade);
        }
        (store, trades)
    }

    #[tokio::test]
    async fn lists_newest_first_with_paging() {
        let user = Uuid::new_v4();
        let (store, trades) = seeded(user).await;

        let all = store.list_trades(user, &TradeFilter::default()).await.unwrap();
        let ids: Vec<_> = all.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![trades[2].id, trades[1].id, trades[0].id]);

        let page = TradeFilter {
            limit: Some(1),
            offset: 1,
            ..Default::default()
        };
        let paged = store.list_trades(user, &page).await.unwrap();
        assert_eq!(paged.len(), 1);
        assert_eq!(paged[0].id, trades[1].id);
    }

    #[tokio::test]
    async fn filters_by_symbol_strategy_and_window() {
        let user = Uuid::new_v4();
        let (store, trades) = seeded(user).await;

        let filter = TradeFilter {
            symbol: Some("USDJPY".into()),
            strategy: Some("W".into()),
            ..Default::default()
        };
        let found = store.list_trades(user, &filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, trades[2].id);

        let recent = store
            .list_trades(user, &TradeFilter::created_since(trades[1].created_at))
            .await
            .unwrap();
        assert_eq!(recent.len(), 2);
    }

    #[tokio::test]
    async fn exited_since_only_returns_closed_trades() {
        let user = Uuid::new_v4();
        let (store, mut trades) = seeded(user).await;
        let exit_at = trades[0].created_at + Duration::days(10);

        let close = CloseTrade { exit_price: dec!(149.90), exit_reason: None, notes: None };
        trades[0].close(close, exit_at).unwrap();
        assert!(store.save_trade(&trades[0]).await.unwrap());

        let exited = store
            .list_trades(user, &TradeFilter::exited_since(exit_at))
            .await
            .unwrap();
        assert_eq!(exited.len(), 1);
        assert_eq!(exited[0].status, TradeStatus::Closed);
        assert_eq!(exited[0].pnl, Some(dec!(30)));
    }

    #[tokio::test]
    async fn other_users_trades_are_invisible() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let (store, trades) = seeded(owner).await;

        assert_eq!(store.get_trade(stranger, trades[0].id).await.unwrap(), None);
        assert!(!store.delete_trade(stranger, trades[0].id).await.unwrap());
        assert!(store.delete_trade(owner, trades[0].id).await.unwrap());
        assert_eq!(store.get_trade(owner, trades[0].id).await.unwrap(), None);
    }
}
