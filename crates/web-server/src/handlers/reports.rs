// In crates/web-server/src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::Utc;
use core_types::TradeStatus;
use database::TradeFilter;

use crate::types::{
    BtmmResponse, ForPeriod, PeriodParams, PnlChartResponse, RecentTradesParams, StatsResponse,
    TradesResponse,
};
use crate::{AppState, Result};

/// Handler for `GET /api/analytics/stats`
pub async fn stats_handler(
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> Result<Json<StatsResponse>> {
    let period = params.resolve();
    let filter = TradeFilter::created_since(period.window_start(Utc::now()));
    let trades = state.store.list_trades(state.user_id, &filter).await?;
    tracing::debug!(%period, trades = trades.len(), "Computing summary statistics");

    Ok(Json(StatsResponse {
        stats: ForPeriod {
            period,
            data: state.engine.compute_stats(&trades),
        },
    }))
}

/// Handler for `GET /api/analytics/btmm`
pub async fn btmm_handler(
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> Result<Json<BtmmResponse>> {
    let period = params.resolve();
    let filter = TradeFilter {
        status: Some(TradeStatus::Closed),
        ..TradeFilter::created_since(period.window_start(Utc::now()))
    };
    let trades = state.store.list_trades(state.user_id, &filter).await?;
    tracing::debug!(%period, trades = trades.len(), "Computing BTMM analytics");

    Ok(Json(BtmmResponse {
        btmm_analytics: ForPeriod {
            period,
            data: state.engine.compute_btmm_analytics(&trades),
        },
    }))
}

/// Handler for `GET /api/analytics/pnl-chart`
pub async fn pnl_chart_handler(
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> Result<Json<PnlChartResponse>> {
    let period = params.resolve();
    let filter = TradeFilter::exited_since(period.window_start(Utc::now()));
    let trades = state.store.list_trades(state.user_id, &filter).await?;

    Ok(Json(PnlChartResponse {
        chart_data: state.engine.compute_pnl_curve(&trades),
    }))
}

/// Handler for `GET /api/analytics/recent-trades`
pub async fn recent_trades_handler(
    State(state): State<AppState>,
    Query(params): Query<RecentTradesParams>,
) -> Result<Json<TradesResponse>> {
    let filter = TradeFilter {
        limit: Some(params.limit),
        ..Default::default()
    };
    let trades = state.store.list_trades(state.user_id, &filter).await?;
    Ok(Json(TradesResponse { trades }))
}
