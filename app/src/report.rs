// In app/src/report.rs

use analytics::{AnalyticsEngine, BtmmAnalytics, SummaryStats};
use anyhow::Result;
use chrono::{DateTime, Utc};
use core_types::Period;
use database::{TradeFilter, TradeStore};
use serde::Serialize;
use uuid::Uuid;
use web_server::types::ForPeriod;

/// The combined output of the `report` subcommand.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalReport {
    pub stats: ForPeriod<SummaryStats>,
    pub btmm_analytics: ForPeriod<BtmmAnalytics>,
}

/// Builds the statistics and BTMM breakdown for `user_id` over `period`.
pub async fn build_report(
    store: &dyn TradeStore,
    user_id: Uuid,
    period: Period,
    now: DateTime<Utc>,
) -> Result<JournalReport> {
    let filter = TradeFilter::created_since(period.window_start(now));
    let trades = store.list_trades(user_id, &filter).await?;
    tracing::info!(%user_id, %period, trades = trades.len(), "Building journal report");

    let engine = AnalyticsEngine::new();
    Ok(JournalReport {
        stats: ForPeriod { period, data: engine.compute_stats(&trades) },
        // Open trades in the window are skipped by the BTMM breakdown.
        btmm_analytics: ForPeriod { period, data: engine.compute_btmm_analytics(&trades) },
    })
}

/// Prints a short human-readable summary followed by the full JSON report.
pub fn print_report(report: &JournalReport) -> Result<()> {
    let stats = &report.stats.data;
    println!("\n--- Trading Journal ({}) ---", report.stats.period);
    println!(
        "  - Trades: {} ({} open, {} closed) | Win rate: {:.2}%",
        stats.total_trades, stats.open_trades, stats.closed_trades, stats.win_rate
    );
    println!(
        "  - P&L: {:.2} | Return on risk: {:.2}% | Avg win: {:.2} | Avg loss: {:.2} | Profit factor: {:.2}",
        stats.total_pnl, stats.total_return, stats.avg_win, stats.avg_loss, stats.profit_factor
    );
    if stats.profit_factor.is_zero() && stats.winning_trades > 0 && stats.losing_trades == 0 {
        println!("    (profit factor undefined: no losing trades in this period)");
    }
    println!("---------------------------------\n");
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
