// In crates/web-server/src/types.rs

use analytics::{BtmmAnalytics, PnlPoint, SummaryStats};
use chrono::{DateTime, Utc};
use core_types::{Period, TradeRecord, TradeStatus};
use database::TradeFilter;
use serde::{Deserialize, Serialize};

/// Query parameters for `GET /api/trades` (e.g., `?status=open&limit=20`).
#[derive(Debug, Deserialize)]
pub struct ListTradesParams {
    pub status: Option<TradeStatus>,
    pub symbol: Option<String>,
    pub strategy: Option<String>,
    #[serde(default = "default_page_size")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

impl From<ListTradesParams> for TradeFilter {
    fn from(params: ListTradesParams) -> Self {
        TradeFilter {
            status: params.status,
            symbol: params.symbol,
            strategy: params.strategy,
            limit: Some(params.limit),
            offset: params.offset,
            ..Default::default()
        }
    }
}

/// The `?period=` selector shared by the analytics endpoints.
#[derive(Debug, Deserialize)]
pub struct PeriodParams {
    pub period: Option<String>,
}

impl PeriodParams {
    pub fn resolve(&self) -> Period {
        Period::parse_or_default(self.period.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub struct RecentTradesParams {
    #[serde(default = "default_recent_limit")]
    pub limit: u32,
}

// Helper functions for serde defaults.
fn default_page_size() -> u32 {
    50
}
fn default_recent_limit() -> u32 {
    10
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct TradeResponse {
    pub trade: TradeRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct TradesResponse {
    pub trades: Vec<TradeRecord>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// An aggregate tagged with the period that was actually applied.
#[derive(Debug, Serialize)]
pub struct ForPeriod<T> {
    pub period: Period,
    #[serde(flatten)]
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub stats: ForPeriod<SummaryStats>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BtmmResponse {
    pub btmm_analytics: ForPeriod<BtmmAnalytics>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlChartResponse {
    pub chart_data: Vec<PnlPoint>,
}
