// In crates/analytics/src/engine.rs

use crate::types::{
    BtmmAnalytics, GroupStats, PnlPoint, RiskRewardBucket, StructureStats, SummaryStats,
};
use core_types::TradeRecord;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use std::collections::HashMap;

/// Group key used when a trade carries no classification.
pub const UNSPECIFIED: &str = "unspecified";

/// The engine responsible for calculating journal statistics from trade data.
///
/// Every method is a pure function of its input slice. Callers are expected to
/// have scoped the trades to one user and one time window already.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculates the summary statistics and strategy/session breakdowns.
    pub fn compute_stats(&self, trades: &[TradeRecord]) -> SummaryStats {
        trades
            .iter()
            .fold(StatsTally::default(), |mut tally, trade| {
                tally.record(trade);
                tally
            })
            .finish()
    }

    /// Calculates market-structure performance and the risk-reward histogram.
    /// Open trades in the input are ignored.
    pub fn compute_btmm_analytics(&self, trades: &[TradeRecord]) -> BtmmAnalytics {
        trades
            .iter()
            .filter(|t| t.is_closed())
            .fold(BtmmAnalytics::default(), |mut analytics, trade| {
                let pnl = trade.pnl.unwrap_or_default();
                let won = pnl > Decimal::ZERO;

                let structure = analytics
                    .market_structure_stats
                    .entry(group_key(trade.market_structure.as_deref()))
                    .or_insert_with(StructureStats::default);
                structure.trades += 1;
                structure.pnl = structure.pnl.saturating_add(pnl);
                if won {
                    structure.wins += 1;
                }

                let ratio = trade.risk_reward_ratio.unwrap_or_default();
                let bucket = analytics
                    .risk_reward_analysis
                    .bucket_mut(RiskRewardBucket::for_ratio(ratio));
                bucket.count += 1;
                bucket.pnl = bucket.pnl.saturating_add(pnl);
                if won {
                    bucket.wins += 1;
                }

                analytics.total_trades += 1;
                analytics
            })
    }

    /// Builds the cumulative realized P&L curve, ordered by exit time.
    pub fn compute_pnl_curve(&self, trades: &[TradeRecord]) -> Vec<PnlPoint> {
        let mut exits: Vec<_> = trades
            .iter()
            .filter(|t| t.is_closed())
            .filter_map(|t| t.exit_time.map(|exit| (exit, t.pnl.unwrap_or_default())))
            .collect();
        exits.sort_by_key(|(exit, _)| *exit);

        exits
            .into_iter()
            .scan(Decimal::ZERO, |running, (date, pnl)| {
                *running = running.saturating_add(pnl);
                Some(PnlPoint {
                    date,
                    pnl,
                    cumulative_pnl: round2(*running),
                })
            })
            .collect()
    }
}

/// Running totals for one `compute_stats` pass. Nothing here is rounded, and sums
/// clamp at the `Decimal` bounds.
#[derive(Default)]
struct StatsTally {
    total: u32,
    open: u32,
    closed: u32,
    winning: u32,
    losing: u32,
    total_pnl: Decimal,
    total_risk: Decimal,
    gross_profit: Decimal,
    gross_loss: Decimal,
    strategy_stats: HashMap<String, GroupStats>,
    session_stats: HashMap<String, GroupStats>,
}

impl StatsTally {
    fn record(&mut self, trade: &TradeRecord) {
        self.total += 1;
        if !trade.is_closed() {
            self.open += 1;
            return;
        }

        let pnl = trade.pnl.unwrap_or_default();
        self.closed += 1;
        self.total_pnl = self.total_pnl.saturating_add(pnl);
        self.total_risk = self.total_risk.saturating_add(trade.risk_amount);
        if pnl > Decimal::ZERO {
            self.winning += 1;
            self.gross_profit = self.gross_profit.saturating_add(pnl);
        } else if pnl < Decimal::ZERO {
            self.losing += 1;
            self.gross_loss = self.gross_loss.saturating_add(pnl);
        }

        for (stats, key) in [
            (&mut self.strategy_stats, trade.strategy.as_deref()),
            (&mut self.session_stats, trade.session.as_deref()),
        ] {
            let group = stats.entry(group_key(key)).or_default();
            group.trades += 1;
            group.pnl = group.pnl.saturating_add(pnl);
            if pnl > Decimal::ZERO {
                group.wins += 1;
            } else if pnl < Decimal::ZERO {
                group.losses += 1;
            }
        }
    }

    fn finish(self) -> SummaryStats {
        let win_rate = percentage(Decimal::from(self.winning), Decimal::from(self.closed));
        let total_return = if self.total_risk > Decimal::ZERO {
            percentage(self.total_pnl, self.total_risk)
        } else {
            Decimal::ZERO
        };
        let avg_win = ratio(self.gross_profit, Decimal::from(self.winning));
        let avg_loss = ratio(self.gross_loss, Decimal::from(self.losing)).abs();
        let profit_factor = if avg_loss > Decimal::ZERO {
            ratio(avg_win, avg_loss)
        } else {
            Decimal::ZERO
        };

        SummaryStats {
            total_trades: self.total,
            open_trades: self.open,
            closed_trades: self.closed,
            winning_trades: self.winning,
            losing_trades: self.losing,
            win_rate: round2(win_rate),
            total_pnl: round2(self.total_pnl),
            total_return: round2(total_return),
            avg_win: round2(avg_win),
            avg_loss: round2(avg_loss),
            profit_factor: round2(profit_factor),
            strategy_stats: self.strategy_stats,
            session_stats: self.session_stats,
        }
    }
}

fn group_key(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(key) if !key.is_empty() => key.to_string(),
        _ => UNSPECIFIED.to_string(),
    }
}

/// Division that yields zero instead of faulting on a zero or overflowing quotient.
fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator.checked_div(denominator).unwrap_or_default()
}

fn percentage(numerator: Decimal, denominator: Decimal) -> Decimal {
    ratio(numerator, denominator)
        .checked_mul(dec!(100))
        .unwrap_or_default()
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
