// In crates/database/src/store.rs

use async_trait::async_trait;
use core_types::TradeRecord;
use uuid::Uuid;

use crate::types::TradeFilter;
use crate::Result;

/// The universal interface for trade persistence.
///
/// Every lookup is scoped by owner: a trade belonging to another user is
/// indistinguishable from a missing one.
#[async_trait]
pub trait TradeStore: Send + Sync {
    /// Persists a freshly opened trade.
    async fn insert_trade(&self, trade: &TradeRecord) -> Result<()>;

    async fn get_trade(&self, user_id: Uuid, id: Uuid) -> Result<Option<TradeRecord>>;

    /// Lists a user's trades matching `filter`, newest first.
    async fn list_trades(&self, user_id: Uuid, filter: &TradeFilter) -> Result<Vec<TradeRecord>>;

    /// Overwrites a stored trade with `trade`.
    ///
    /// # Returns
    ///
    /// `false` if no trade with that id exists for `trade.user_id`.
    async fn save_trade(&self, trade: &TradeRecord) -> Result<bool>;

    /// Returns `false` if nothing was deleted.
    async fn delete_trade(&self, user_id: Uuid, id: Uuid) -> Result<bool>;
}
