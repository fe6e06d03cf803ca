// In crates/web-server/src/handlers/trades.rs

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::Utc;
use core_types::{CloseTrade, NewTrade, TradeRecord, TradeUpdate};
use uuid::Uuid;

use crate::types::{ListTradesParams, MessageResponse, TradeResponse, TradesResponse};
use crate::{AppState, Error, Result};

/// Handler for `POST /api/trades`
pub async fn create_trade_handler(
    State(state): State<AppState>,
    Json(new_trade): Json<NewTrade>,
) -> Result<Json<TradeResponse>> {
    let trade = TradeRecord::open(state.user_id, new_trade, Utc::now())?;
    state.store.insert_trade(&trade).await?;
    tracing::info!(
        trade_id = %trade.id,
        symbol = %trade.symbol,
        direction = %trade.direction,
        "Trade opened"
    );

    Ok(Json(TradeResponse {
        trade,
        message: Some("Trade created successfully"),
    }))
}

/// Handler for `GET /api/trades`
pub async fn list_trades_handler(
    State(state): State<AppState>,
    Query(params): Query<ListTradesParams>,
) -> Result<Json<TradesResponse>> {
    let trades = state.store.list_trades(state.user_id, &params.into()).await?;
    Ok(Json(TradesResponse { trades }))
}

/// Handler for `GET /api/trades/{id}`
pub async fn get_trade_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TradeResponse>> {
    let trade = fetch_trade(&state, id).await?;
    Ok(Json(TradeResponse { trade, message: None }))
}

/// Handler for `PUT /api/trades/{id}`
pub async fn update_trade_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<TradeUpdate>,
) -> Result<Json<TradeResponse>> {
    let mut trade = fetch_trade(&state, id).await?;
    trade.apply_update(update, Utc::now())?;
    persist(&state, &trade).await?;

    Ok(Json(TradeResponse {
        trade,
        message: Some("Trade updated successfully"),
    }))
}

/// Handler for `POST /api/trades/{id}/close`
pub async fn close_trade_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(close): Json<CloseTrade>,
) -> Result<Json<TradeResponse>> {
    let mut trade = fetch_trade(&state, id).await?;
    trade.close(close, Utc::now())?;
    persist(&state, &trade).await?;
    tracing::info!(trade_id = %trade.id, pnl = ?trade.pnl, "Trade closed");

    Ok(Json(TradeResponse {
        trade,
        message: Some("Trade closed successfully"),
    }))
}

/// Handler for `DELETE /api/trades/{id}`
pub async fn delete_trade_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    if !state.store.delete_trade(state.user_id, id).await? {
        return Err(trade_not_found(id));
    }
    tracing::info!(trade_id = %id, "Trade deleted");

    Ok(Json(MessageResponse {
        message: "Trade deleted successfully",
    }))
}

async fn fetch_trade(state: &AppState, id: Uuid) -> Result<TradeRecord> {
    state
        .store
        .get_trade(state.user_id, id)
        .await?
        .ok_or_else(|| trade_not_found(id))
}

async fn persist(state: &AppState, trade: &TradeRecord) -> Result<()> {
    // The row can vanish between fetch and save if a delete races us.
    if state.store.save_trade(trade).await? {
        Ok(())
    } else {
        Err(trade_not_found(trade.id))
    }
}

fn trade_not_found(id: Uuid) -> Error {
    tracing::warn!(trade_id = %id, "Trade not found");
    Error::NotFound("Trade not found".to_string())
}
