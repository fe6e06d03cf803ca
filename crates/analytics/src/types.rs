// In crates/analytics/src/types.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Win/loss breakdown for one strategy or session.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupStats {
    pub trades: u32,
    pub wins: u32,
    pub losses: u32,
    pub pnl: Decimal,
}

/// Performance of one market-structure context. Carries no loss count.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StructureStats {
    pub trades: u32,
    pub wins: u32,
    pub pnl: Decimal,
}

/// One risk-reward histogram bucket.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BucketStats {
    pub count: u32,
    pub wins: u32,
    pub pnl: Decimal,
}

/// Headline statistics over a window of trades.
///
/// Scalars are rounded to two decimal places; the per-group `pnl` sums are not.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total_trades: u32,
    pub open_trades: u32,
    pub closed_trades: u32,
    pub winning_trades: u32,
    pub losing_trades: u32,
    pub win_rate: Decimal,
    #[serde(rename = "totalPnL")]
    pub total_pnl: Decimal,
    pub total_return: Decimal,
    pub avg_win: Decimal,
    pub avg_loss: Decimal,
    /// `avg_win / avg_loss`, or `0` when there are no losses to compare against.
    /// A zero here does not distinguish "no edge" from "no losing trades yet".
    pub profit_factor: Decimal,
    pub strategy_stats: HashMap<String, GroupStats>,
    pub session_stats: HashMap<String, GroupStats>,
}

/// The four fixed risk-reward ranges, lower bound inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskRewardBucket {
    BelowOne,
    OneToTwo,
    TwoToThree,
    AboveThree,
}

impl RiskRewardBucket {
    pub const ALL: [RiskRewardBucket; 4] = [
        RiskRewardBucket::BelowOne,
        RiskRewardBucket::OneToTwo,
        RiskRewardBucket::TwoToThree,
        RiskRewardBucket::AboveThree,
    ];

    pub fn for_ratio(ratio: Decimal) -> Self {
        if ratio < dec!(1) {
            RiskRewardBucket::BelowOne
        } else if ratio < dec!(2) {
            RiskRewardBucket::OneToTwo
        } else if ratio < dec!(3) {
            RiskRewardBucket::TwoToThree
        } else {
            RiskRewardBucket::AboveThree
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskRewardBucket::BelowOne => "Below 1:1",
            RiskRewardBucket::OneToTwo => "1:1 to 1:2",
            RiskRewardBucket::TwoToThree => "1:2 to 1:3",
            RiskRewardBucket::AboveThree => "Above 1:3",
        }
    }
}

/// Risk-reward histogram. Every bucket is always serialized, even when empty.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskRewardAnalysis {
    #[serde(rename = "Below 1:1")]
    pub below_one: BucketStats,
    #[serde(rename = "1:1 to 1:2")]
    pub one_to_two: BucketStats,
    #[serde(rename = "1:2 to 1:3")]
    pub two_to_three: BucketStats,
    #[serde(rename = "Above 1:3")]
    pub above_three: BucketStats,
}

impl RiskRewardAnalysis {
    pub fn bucket(&self, bucket: RiskRewardBucket) -> &BucketStats {
        match bucket {
            RiskRewardBucket::BelowOne => &self.below_one,
            RiskRewardBucket::OneToTwo => &self.one_to_two,
            RiskRewardBucket::TwoToThree => &self.two_to_three,
            RiskRewardBucket::AboveThree => &self.above_three,
        }
    }

    pub fn bucket_mut(&mut self, bucket: RiskRewardBucket) -> &mut BucketStats {
        match bucket {
            RiskRewardBucket::BelowOne => &mut self.below_one,
            RiskRewardBucket::OneToTwo => &mut self.one_to_two,
            RiskRewardBucket::TwoToThree => &mut self.two_to_three,
            RiskRewardBucket::AboveThree => &mut self.above_three,
        }
    }
}

/// BTMM-specific breakdown of closed trades.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BtmmAnalytics {
    pub market_structure_stats: HashMap<String, StructureStats>,
    pub risk_reward_analysis: RiskRewardAnalysis,
    /// Number of closed trades analysed.
    pub total_trades: u32,
}

/// A point on the cumulative realized P&L curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlPoint {
    pub date: DateTime<Utc>,
    pub pnl: Decimal,
    #[serde(rename = "cumulativePnL")]
    pub cumulative_pnl: Decimal,
}
