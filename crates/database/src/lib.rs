// In crates/database/src/lib.rs

use app_config::DatabaseSettings;
use async_trait::async_trait;
use core_types::TradeRecord;
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

pub mod error;
pub mod memory;
pub mod store;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use store::TradeStore;
pub use types::{TradeFilter, TradeRow};

/// A wrapper around the `sqlx` connection pool.
#[derive(Debug, Clone)]
pub struct Db(PgPool);

/// Establishes a connection pool to the PostgreSQL database and runs migrations.
///
/// # Arguments
///
/// * `settings`: The database configuration settings.
///
/// # Returns
///
/// A `Result` containing the `Db` wrapper on success, or an `Error` on failure.
pub async fn connect(settings: &DatabaseSettings) -> Result<Db> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.url)
        .await
        .map_err(Error::ConnectionError)?;

    sqlx::migrate!("../../migrations").run(&pool).await?;
    tracing::debug!(max_connections = settings.max_connections, "Trade store migrations applied");

    Ok(Db(pool))
}

const TRADE_COLUMNS: &str = "id, user_id, symbol, direction, entry_price, exit_price, stop_loss, \
     take_profit, position_size, risk_amount, risk_reward_ratio, strategy, market_structure, \
     session, entry_reason, exit_reason, notes, status, pnl, pnl_percentage, entry_time, \
     exit_time, created_at, updated_at";

#[async_trait]
impl TradeStore for Db {
    async fn insert_trade(&self, trade: &TradeRecord) -> Result<()> {
        sqlx::query(&format!(
            "INSERT INTO trades ({TRADE_COLUMNS}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, \
              $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24)"
        ))
        .bind(trade.id)
        .bind(trade.user_id)
        .bind(&trade.symbol)
        .bind(trade.direction.as_str())
        .bind(trade.entry_price)
        .bind(trade.exit_price)
        .bind(trade.stop_loss)
        .bind(trade.take_profit)
        .bind(trade.position_size)
        .bind(trade.risk_amount)
        .bind(trade.risk_reward_ratio)
        .bind(&trade.strategy)
        .bind(&trade.market_structure)
        .bind(&trade.session)
        .bind(&trade.entry_reason)
        .bind(&trade.exit_reason)
        .bind(&trade.notes)
        .bind(trade.status.as_str())
        .bind(trade.pnl)
        .bind(trade.pnl_percentage)
        .bind(trade.entry_time)
        .bind(trade.exit_time)
        .bind(trade.created_at)
        .bind(trade.updated_at)
        .execute(&self.0)
        .await
        .map_err(Error::OperationFailed)?;

        Ok(())
    }

    async fn get_trade(&self, user_id: Uuid, id: Uuid) -> Result<Option<TradeRecord>> {
        let row = sqlx::query_as::<_, TradeRow>(&format!(
            "SELECT {TRADE_COLUMNS} FROM trades WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.0)
        .await
        .map_err(Error::OperationFailed)?;

        row.map(TradeRow::into_record).transpose()
    }

    async fn list_trades(&self, user_id: Uuid, filter: &TradeFilter) -> Result<Vec<TradeRecord>> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {TRADE_COLUMNS} FROM trades WHERE user_id = "));
        query.push_bind(user_id);

        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(symbol) = &filter.symbol {
            query.push(" AND symbol = ").push_bind(symbol.clone());
        }
        if let Some(strategy) = &filter.strategy {
            query.push(" AND strategy = ").push_bind(strategy.clone());
        }
        if let Some(since) = filter.created_since {
            query.push(" AND created_at >= ").push_bind(since);
        }
        if let Some(since) = filter.exited_since {
            query.push(" AND exit_time >= ").push_bind(since);
        }
        query.push(" ORDER BY created_at DESC");
        if let Some(limit) = filter.limit {
            query.push(" LIMIT ").push_bind(i64::from(limit));
        }
        if filter.offset > 0 {
            query.push(" OFFSET ").push_bind(i64::from(filter.offset));
        }

        let rows = query
            .build_query_as::<TradeRow>()
            .fetch_all(&self.0)
            .await
            .map_err(Error::OperationFailed)?;
        tracing::debug!(%user_id, rows = rows.len(), "Fetched trades");

        rows.into_iter().map(TradeRow::into_record).collect()
    }

    async fn save_trade(&self, trade: &TradeRecord) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE trades SET
                symbol = $3, direction = $4, entry_price = $5, exit_price = $6,
                stop_loss = $7, take_profit = $8, position_size = $9, risk_amount = $10,
                risk_reward_ratio = $11, strategy = $12, market_structure = $13, session = $14,
                entry_reason = $15, exit_reason = $16, notes = $17, status = $18,
                pnl = $19, pnl_percentage = $20, exit_time = $21, updated_at = $22
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(trade.id)
        .bind(trade.user_id)
        .bind(&trade.symbol)
        .bind(trade.direction.as_str())
        .bind(trade.entry_price)
        .bind(trade.exit_price)
        .bind(trade.stop_loss)
        .bind(trade.take_profit)
        .bind(trade.position_size)
        .bind(trade.risk_amount)
        .bind(trade.risk_reward_ratio)
        .bind(&trade.strategy)
        .bind(&trade.market_structure)
        .bind(&trade.session)
        .bind(&trade.entry_reason)
        .bind(&trade.exit_reason)
        .bind(&trade.notes)
        .bind(trade.status.as_str())
        .bind(trade.pnl)
        .bind(trade.pnl_percentage)
        .bind(trade.exit_time)
        .bind(trade.updated_at)
        .execute(&self.0)
        .await
        .map_err(Error::OperationFailed)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_trade(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM trades WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.0)
            .await
            .map_err(Error::OperationFailed)?;

        Ok(result.rows_affected() > 0)
    }
}
