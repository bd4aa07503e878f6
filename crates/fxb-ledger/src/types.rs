use std::fmt;

use chrono::{DateTime, Utc};
use fxb_execution::OrderId;
use serde::{Deserialize, Serialize};

use crate::trade_id::TradeId;

// ---------------------------------------------------------------------------
// Leg type / status
// ---------------------------------------------------------------------------

/// Which leg of a bracket a record describes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegType {
    Entry,
    TakeProfit,
    StopLoss,
}

impl fmt::Display for LegType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LegType::Entry => write!(f, "Entry"),
            LegType::TakeProfit => write!(f, "Take Profit"),
            LegType::StopLoss => write!(f, "Stop Loss"),
        }
    }
}

/// Ledger-side status of a single leg.
///
/// ```text
/// NotFilled ──► Filled | TakeProfitHit | StopLossHit | Canceled
///
/// Entry only:  TakeProfitHit ──► Filled
/// ```
///
/// An entry fill stamps the entry record with `TakeProfitHit` (see
/// [`crate::BracketLedger::on_fill_notification`]); the later exit fill
/// relabels it `Filled`. Nothing else leaves a resolved status.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegStatus {
    NotFilled,
    Filled,
    TakeProfitHit,
    StopLossHit,
    Canceled,
}

impl LegStatus {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, LegStatus::NotFilled)
    }
}

impl fmt::Display for LegStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LegStatus::NotFilled => write!(f, "Not Filled"),
            LegStatus::Filled => write!(f, "Filled"),
            LegStatus::TakeProfitHit => write!(f, "Take Profit Hit"),
            LegStatus::StopLossHit => write!(f, "Stop Loss Hit"),
            LegStatus::Canceled => write!(f, "Canceled"),
        }
    }
}

// ---------------------------------------------------------------------------
// TradeRecord
// ---------------------------------------------------------------------------

/// One row of the trade table; three rows per bracket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Bracket creation time (the bar time that triggered it).
    pub date: DateTime<Utc>,
    pub trade_id: TradeId,
    pub order_id: OrderId,
    pub leg_type: LegType,
    pub status: LegStatus,
    /// Submitted price in micros. For the market entry this is the reference
    /// close the bracket was built from.
    pub price_micros: i64,
    /// Signed quantity; exit legs carry the opposite sign of the entry.
    pub quantity: i64,
}

impl TradeRecord {
    /// Whether moving this record to `next` respects the forward-only rule.
    pub fn can_move_to(&self, next: LegStatus) -> bool {
        match (self.status, next) {
            (LegStatus::NotFilled, LegStatus::NotFilled) => false,
            (LegStatus::NotFilled, _) => true,
            (LegStatus::TakeProfitHit, LegStatus::Filled) => self.leg_type == LegType::Entry,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// BracketPrices
// ---------------------------------------------------------------------------

/// The three prices of one bracket, in micros.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BracketPrices {
    pub entry_micros: i64,
    pub take_profit_micros: i64,
    pub stop_loss_micros: i64,
}

impl BracketPrices {
    pub fn new(entry_micros: i64, take_profit_micros: i64, stop_loss_micros: i64) -> Self {
        Self {
            entry_micros,
            take_profit_micros,
            stop_loss_micros,
        }
    }

    /// Long bracket around `entry_micros`: TP above by `take_profit_offset`,
    /// SL below by `stop_loss_offset`.
    pub fn from_offsets(
        entry_micros: i64,
        take_profit_offset_micros: i64,
        stop_loss_offset_micros: i64,
    ) -> Self {
        Self {
            entry_micros,
            take_profit_micros: entry_micros.saturating_add(take_profit_offset_micros),
            stop_loss_micros: entry_micros.saturating_sub(stop_loss_offset_micros),
        }
    }
}

// ---------------------------------------------------------------------------
// RunSummary
// ---------------------------------------------------------------------------

/// End-of-run statistics over the trade table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_entries: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// `winning_trades / total_entries`, or `0.0` with no entries.
    pub win_rate: f64,
}

impl RunSummary {
    pub fn from_counts(total_entries: usize, winning_trades: usize, losing_trades: usize) -> Self {
        let win_rate = if total_entries > 0 {
            winning_trades as f64 / total_entries as f64
        } else {
            0.0
        };
        Self {
            total_entries,
            winning_trades,
            losing_trades,
            win_rate,
        }
    }

    /// Report lines in the order the end-of-run log prints them.
    pub fn report_lines(&self) -> Vec<String> {
        vec![
            format!("Total Entries: {}", self.total_entries),
            format!("Winning Trades: {}", self.winning_trades),
            format!("Overall Win Rate: {:.2}%", self.win_rate * 100.0),
            format!("Losing Trades: {}", self.losing_trades),
        ]
    }
}
