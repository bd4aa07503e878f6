//! Append-only bracket ledger.
//!
//! # Layout
//!
//! `records` is the trade table in submission order. Two indexes sit beside
//! it:
//!
//! - `by_order_id`: host order id -> row, for O(1) fill lookup.
//! - `brackets`: the three rows of each bracket. Siblings are found through
//!   this, never by searching on `trade_id`.
//!
//! # Fill handling
//!
//! ```text
//! fill(Entry)      entry := TakeProfitHit            (no cancel)
//! fill(TakeProfit) cancel(SL); SL := Canceled; entry := Filled; TP := TakeProfitHit
//! fill(StopLoss)   cancel(TP); TP := Canceled; entry := Filled; SL := StopLossHit
//! ```
//!
//! The entry row gets `TakeProfitHit` on its own fill and is relabelled
//! `Filled` when either exit fills. The entry label never counts as a win:
//! wins are counted on take-profit rows only.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use fxb_execution::{ExecutionHost, OrderId, OrderStatus};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::trade_id::TradeId;
use crate::types::{BracketPrices, LegStatus, LegType, RunSummary, TradeRecord};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The host refused a command. `command` names the host call.
    HostRejected {
        command: &'static str,
        reason: String,
    },
    /// The host handed back an order id the table already holds.
    DuplicateOrderId(OrderId),
    /// A status change would break the forward-only rule.
    IllegalTransition {
        order_id: OrderId,
        from: LegStatus,
        to: LegStatus,
    },
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HostRejected { command, reason } => {
                write!(f, "host rejected {command}: {reason}")
            }
            Self::DuplicateOrderId(id) => {
                write!(f, "ledger invariant: order_id {id} already recorded")
            }
            Self::IllegalTransition { order_id, from, to } => write!(
                f,
                "ledger invariant: order {order_id} cannot move {from:?} -> {to:?}"
            ),
        }
    }
}

impl std::error::Error for LedgerError {}

fn host_rejected(
    command: &'static str,
) -> impl FnOnce(Box<dyn std::error::Error + Send + Sync>) -> LedgerError {
    move |e| LedgerError::HostRejected {
        command,
        reason: e.to_string(),
    }
}

/// Cancel legs of a bracket that failed part way through submission.
fn unwind_accepted<H: ExecutionHost + ?Sized>(host: &mut H, accepted: &[&OrderId]) {
    for id in accepted {
        match host.cancel_order(id) {
            Ok(()) => warn!(order_id = %id, "bracket incomplete; accepted leg canceled"),
            Err(e) => warn!(
                order_id = %id,
                error = %e,
                "bracket incomplete; cancel of accepted leg failed"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// FillOutcome
// ---------------------------------------------------------------------------

/// What a fill notification did to the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FillOutcome {
    /// No record carries this order id.
    UnknownOrder,
    /// The event status was not `Filled`.
    NotAFill,
    /// The leg was already resolved (duplicate fill, or fill after cancel).
    AlreadyResolved { status: LegStatus },
    EntryFilled { trade_id: TradeId },
    /// `cancel_rejected` carries the host's reason when the sibling cancel
    /// failed. Statuses are written either way.
    TakeProfitHit {
        trade_id: TradeId,
        canceled: OrderId,
        cancel_rejected: Option<String>,
    },
    StopLossHit {
        trade_id: TradeId,
        canceled: OrderId,
        cancel_rejected: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// BracketLedger
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug)]
struct BracketRows {
    entry: usize,
    take_profit: usize,
    stop_loss: usize,
}

#[derive(Copy, Clone, Debug)]
struct LegRef {
    row: usize,
    bracket: usize,
}

/// Trade table for one symbol.
#[derive(Debug)]
pub struct BracketLedger {
    symbol: String,
    records: Vec<TradeRecord>,
    by_order_id: HashMap<OrderId, LegRef>,
    brackets: Vec<BracketRows>,
    rng: StdRng,
}

impl BracketLedger {
    /// Ledger with trade ids drawn from an entropy-seeded RNG.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self::with_rng(symbol, StdRng::from_entropy())
    }

    /// Ledger with a fixed seed: identical runs produce identical trade ids.
    pub fn with_seed(symbol: impl Into<String>, seed: u64) -> Self {
        Self::with_rng(symbol, StdRng::seed_from_u64(seed))
    }

    fn with_rng(symbol: impl Into<String>, rng: StdRng) -> Self {
        Self {
            symbol: symbol.into(),
            records: Vec::new(),
            by_order_id: HashMap::new(),
            brackets: Vec::new(),
            rng,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The full trade table in submission order.
    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of brackets submitted.
    pub fn bracket_count(&self) -> usize {
        self.brackets.len()
    }

    pub fn record(&self, order_id: &OrderId) -> Option<&TradeRecord> {
        self.by_order_id
            .get(order_id)
            .map(|leg| &self.records[leg.row])
    }

    /// All rows carrying `trade_id`, in table order.
    pub fn legs<'a>(&'a self, trade_id: &'a TradeId) -> impl Iterator<Item = &'a TradeRecord> {
        self.records.iter().filter(move |r| &r.trade_id == trade_id)
    }

    /// Submit entry, take-profit and stop-loss to the host and record them.
    ///
    /// The entry is a market order for `+quantity`; both exits are for
    /// `-quantity` (limit at the take-profit price, stop at the stop-loss
    /// price). Rows are appended only after all three submissions succeed.
    ///
    /// # Errors
    /// [`LedgerError::HostRejected`] if any submission fails. Legs the host
    /// had already accepted for this bracket are canceled before returning,
    /// so no untracked order stays live.
    pub fn submit_bracket<H: ExecutionHost + ?Sized>(
        &mut self,
        host: &mut H,
        date: DateTime<Utc>,
        prices: BracketPrices,
        quantity: i64,
    ) -> Result<TradeId, LedgerError> {
        let entry_id = host
            .submit_market_order(&self.symbol, quantity)
            .map_err(host_rejected("submit_market_order"))?;

        let tp_id =
            match host.submit_limit_order(&self.symbol, -quantity, prices.take_profit_micros) {
                Ok(id) => id,
                Err(e) => {
                    unwind_accepted(host, &[&entry_id]);
                    return Err(host_rejected("submit_limit_order")(e));
                }
            };

        let sl_id = match host.submit_stop_order(&self.symbol, -quantity, prices.stop_loss_micros) {
            Ok(id) => id,
            Err(e) => {
                unwind_accepted(host, &[&entry_id, &tp_id]);
                return Err(host_rejected("submit_stop_order")(e));
            }
        };

        for id in [&entry_id, &tp_id, &sl_id] {
            if self.by_order_id.contains_key(id) {
                return Err(LedgerError::DuplicateOrderId(id.clone()));
            }
        }
        if tp_id == entry_id {
            return Err(LedgerError::DuplicateOrderId(tp_id));
        }
        if sl_id == entry_id || sl_id == tp_id {
            return Err(LedgerError::DuplicateOrderId(sl_id));
        }

        let trade_id = TradeId::generate(&mut self.rng);
        let bracket = self.brackets.len();
        let base = self.records.len();

        let legs = [
            (entry_id, LegType::Entry, prices.entry_micros, quantity),
            (tp_id, LegType::TakeProfit, prices.take_profit_micros, -quantity),
            (sl_id, LegType::StopLoss, prices.stop_loss_micros, -quantity),
        ];
        for (offset, (order_id, leg_type, price_micros, qty)) in legs.into_iter().enumerate() {
            self.by_order_id.insert(
                order_id.clone(),
                LegRef {
                    row: base + offset,
                    bracket,
                },
            );
            self.records.push(TradeRecord {
                date,
                trade_id: trade_id.clone(),
                order_id,
                leg_type,
                status: LegStatus::NotFilled,
                price_micros,
                quantity: qty,
            });
        }
        self.brackets.push(BracketRows {
            entry: base,
            take_profit: base + 1,
            stop_loss: base + 2,
        });

        debug!(
            trade_id = %trade_id,
            entry = prices.entry_micros,
            take_profit = prices.take_profit_micros,
            stop_loss = prices.stop_loss_micros,
            quantity,
            "bracket submitted"
        );

        Ok(trade_id)
    }

    /// React to an order event from the host.
    ///
    /// Only `Filled` events for known, unresolved legs change anything. A
    /// filled exit leg cancels its sibling at the host and then writes all
    /// three statuses. A rejected cancel is logged and reported in the
    /// outcome; the fill is still recorded.
    ///
    /// # Errors
    /// [`LedgerError::IllegalTransition`] if the bracket is in a state the
    /// forward-only rule cannot reconcile.
    pub fn on_fill_notification<H: ExecutionHost + ?Sized>(
        &mut self,
        host: &mut H,
        order_id: &OrderId,
        fill_status: OrderStatus,
    ) -> Result<FillOutcome, LedgerError> {
        let Some(leg) = self.by_order_id.get(order_id).copied() else {
            debug!(order_id = %order_id, "order event for unknown order ignored");
            return Ok(FillOutcome::UnknownOrder);
        };
        if fill_status != OrderStatus::Filled {
            return Ok(FillOutcome::NotAFill);
        }

        let filled = &self.records[leg.row];
        if filled.status.is_resolved() {
            warn!(
                order_id = %order_id,
                status = ?filled.status,
                "fill for already resolved leg ignored"
            );
            return Ok(FillOutcome::AlreadyResolved {
                status: filled.status,
            });
        }
        let trade_id = filled.trade_id.clone();
        let leg_type = filled.leg_type;
        let rows = self.brackets[leg.bracket];

        match leg_type {
            LegType::Entry => {
                // Entry fills carry the take-profit label; see module docs.
                self.set_status(leg.row, LegStatus::TakeProfitHit)?;
                debug!(trade_id = %trade_id, "entry filled");
                Ok(FillOutcome::EntryFilled { trade_id })
            }
            LegType::TakeProfit => {
                let (canceled, cancel_rejected) = self.resolve_exit(
                    host,
                    rows.entry,
                    (leg.row, LegStatus::TakeProfitHit),
                    rows.stop_loss,
                )?;
                debug!(
                    trade_id = %trade_id,
                    canceled = %canceled,
                    "take profit hit, stop loss canceled"
                );
                Ok(FillOutcome::TakeProfitHit {
                    trade_id,
                    canceled,
                    cancel_rejected,
                })
            }
            LegType::StopLoss => {
                let (canceled, cancel_rejected) = self.resolve_exit(
                    host,
                    rows.entry,
                    (leg.row, LegStatus::StopLossHit),
                    rows.take_profit,
                )?;
                debug!(
                    trade_id = %trade_id,
                    canceled = %canceled,
                    "stop loss hit, take profit canceled"
                );
                Ok(FillOutcome::StopLossHit {
                    trade_id,
                    canceled,
                    cancel_rejected,
                })
            }
        }
    }

    /// Cancel `sibling` at the host, then write all three statuses. The
    /// second value is the host's reason if it refused the cancel.
    fn resolve_exit<H: ExecutionHost + ?Sized>(
        &mut self,
        host: &mut H,
        entry: usize,
        (filled, filled_status): (usize, LegStatus),
        sibling: usize,
    ) -> Result<(OrderId, Option<String>), LedgerError> {
        self.check_move(sibling, LegStatus::Canceled)?;
        self.check_move(filled, filled_status)?;
        let entry_needs_update = self.records[entry].status != LegStatus::Filled;
        if entry_needs_update {
            self.check_move(entry, LegStatus::Filled)?;
        }

        let sibling_id = self.records[sibling].order_id.clone();
        let cancel_rejected = match host.cancel_order(&sibling_id) {
            Ok(()) => None,
            Err(e) => {
                warn!(
                    order_id = %sibling_id,
                    error = %e,
                    "host rejected sibling cancel; fill recorded"
                );
                Some(e.to_string())
            }
        };

        self.records[sibling].status = LegStatus::Canceled;
        if entry_needs_update {
            self.records[entry].status = LegStatus::Filled;
        }
        self.records[filled].status = filled_status;

        Ok((sibling_id, cancel_rejected))
    }

    fn check_move(&self, row: usize, to: LegStatus) -> Result<(), LedgerError> {
        let r = &self.records[row];
        if r.can_move_to(to) {
            Ok(())
        } else {
            Err(LedgerError::IllegalTransition {
                order_id: r.order_id.clone(),
                from: r.status,
                to,
            })
        }
    }

    fn set_status(&mut self, row: usize, to: LegStatus) -> Result<(), LedgerError> {
        self.check_move(row, to)?;
        self.records[row].status = to;
        Ok(())
    }

    /// Entries, wins (take-profit rows hit) and losses (stop-loss rows hit).
    pub fn compute_run_summary(&self) -> RunSummary {
        let mut total_entries = 0;
        let mut winning_trades = 0;
        let mut losing_trades = 0;
        for r in &self.records {
            match (r.leg_type, r.status) {
                (LegType::Entry, _) => total_entries += 1,
                (LegType::TakeProfit, LegStatus::TakeProfitHit) => winning_trades += 1,
                (LegType::StopLoss, LegStatus::StopLossHit) => losing_trades += 1,
                _ => {}
            }
        }
        RunSummary::from_counts(total_entries, winning_trades, losing_trades)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fxb_execution::HostResult;

    #[derive(Default)]
    struct SeqHost {
        next: u64,
        cancels: Vec<OrderId>,
    }

    impl SeqHost {
        fn id(&mut self) -> OrderId {
            self.next += 1;
            OrderId::new(self.next.to_string())
        }
    }

    impl ExecutionHost for SeqHost {
        fn submit_market_order(&mut self, _: &str, _: i64) -> HostResult<OrderId> {
            Ok(self.id())
        }
        fn submit_limit_order(&mut self, _: &str, _: i64, _: i64) -> HostResult<OrderId> {
            Ok(self.id())
        }
        fn submit_stop_order(&mut self, _: &str, _: i64, _: i64) -> HostResult<OrderId> {
            Ok(self.id())
        }
        fn cancel_order(&mut self, order_id: &OrderId) -> HostResult<()> {
            self.cancels.push(order_id.clone());
            Ok(())
        }
    }

    /// Hands out the same id for every submit.
    struct StuckHost;

    impl ExecutionHost for StuckHost {
        fn submit_market_order(&mut self, _: &str, _: i64) -> HostResult<OrderId> {
            Ok(OrderId::new("7"))
        }
        fn submit_limit_order(&mut self, _: &str, _: i64, _: i64) -> HostResult<OrderId> {
            Ok(OrderId::new("7"))
        }
        fn submit_stop_order(&mut self, _: &str, _: i64, _: i64) -> HostResult<OrderId> {
            Ok(OrderId::new("7"))
        }
        fn cancel_order(&mut self, _: &OrderId) -> HostResult<()> {
            Ok(())
        }
    }

    /// Reuses the entry id for the stop order.
    #[derive(Default)]
    struct EchoStopHost {
        next: u64,
    }

    impl ExecutionHost for EchoStopHost {
        fn submit_market_order(&mut self, _: &str, _: i64) -> HostResult<OrderId> {
            self.next += 1;
            Ok(OrderId::new(self.next.to_string()))
        }
        fn submit_limit_order(&mut self, _: &str, _: i64, _: i64) -> HostResult<OrderId> {
            self.next += 1;
            Ok(OrderId::new(self.next.to_string()))
        }
        fn submit_stop_order(&mut self, _: &str, _: i64, _: i64) -> HostResult<OrderId> {
            Ok(OrderId::new("1"))
        }
        fn cancel_order(&mut self, _: &OrderId) -> HostResult<()> {
            Ok(())
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 1, 4, 10, 0, 0).unwrap()
    }

    fn prices() -> BracketPrices {
        BracketPrices::new(1_000_000, 1_003_000, 999_000)
    }

    #[test]
    fn rows_are_indexed_by_order_id() {
        let mut host = SeqHost::default();
        let mut ledger = BracketLedger::with_seed("AUDUSD", 1);
        ledger.submit_bracket(&mut host, t0(), prices(), 1).unwrap();

        let tp = ledger.record(&OrderId::new("2")).unwrap();
        assert_eq!(tp.leg_type, LegType::TakeProfit);
        assert_eq!(tp.quantity, -1);
        assert_eq!(tp.price_micros, 1_003_000);
        assert!(ledger.record(&OrderId::new("99")).is_none());
    }

    #[test]
    fn host_reusing_an_order_id_is_refused() {
        let mut ledger = BracketLedger::with_seed("AUDUSD", 1);
        let err = ledger
            .submit_bracket(&mut StuckHost, t0(), prices(), 1)
            .unwrap_err();
        assert_eq!(err, LedgerError::DuplicateOrderId(OrderId::new("7")));
        assert!(ledger.is_empty());
    }

    #[test]
    fn collision_names_the_colliding_leg() {
        let mut ledger = BracketLedger::with_seed("AUDUSD", 1);
        let err = ledger
            .submit_bracket(&mut EchoStopHost::default(), t0(), prices(), 1)
            .unwrap_err();
        assert_eq!(err, LedgerError::DuplicateOrderId(OrderId::new("1")));
        assert!(ledger.is_empty());
    }

    #[test]
    fn entry_fill_then_take_profit_relabels_entry() {
        let mut host = SeqHost::default();
        let mut ledger = BracketLedger::with_seed("AUDUSD", 1);
        ledger.submit_bracket(&mut host, t0(), prices(), 1).unwrap();

        let out = ledger
            .on_fill_notification(&mut host, &OrderId::new("1"), OrderStatus::Filled)
            .unwrap();
        assert!(matches!(out, FillOutcome::EntryFilled { .. }));
        assert_eq!(
            ledger.record(&OrderId::new("1")).unwrap().status,
            LegStatus::TakeProfitHit
        );
        assert!(host.cancels.is_empty());

        ledger
            .on_fill_notification(&mut host, &OrderId::new("2"), OrderStatus::Filled)
            .unwrap();
        assert_eq!(
            ledger.record(&OrderId::new("1")).unwrap().status,
            LegStatus::Filled
        );
        // Entry label never counts as a win.
        assert_eq!(ledger.compute_run_summary().winning_trades, 1);
    }

    #[test]
    fn non_fill_status_is_ignored() {
        let mut host = SeqHost::default();
        let mut ledger = BracketLedger::with_seed("AUDUSD", 1);
        ledger.submit_bracket(&mut host, t0(), prices(), 1).unwrap();

        for s in [
            OrderStatus::Submitted,
            OrderStatus::PartiallyFilled,
            OrderStatus::Canceled,
            OrderStatus::Invalid,
        ] {
            let out = ledger
                .on_fill_notification(&mut host, &OrderId::new("2"), s)
                .unwrap();
            assert_eq!(out, FillOutcome::NotAFill);
        }
        assert!(ledger
            .records()
            .iter()
            .all(|r| r.status == LegStatus::NotFilled));
        assert!(host.cancels.is_empty());
    }

    #[test]
    fn legs_filter_by_trade_id() {
        let mut host = SeqHost::default();
        let mut ledger = BracketLedger::with_seed("AUDUSD", 9);
        let a = ledger.submit_bracket(&mut host, t0(), prices(), 1).unwrap();
        let b = ledger.submit_bracket(&mut host, t0(), prices(), 1).unwrap();
        assert_ne!(a, b);
        assert_eq!(ledger.legs(&a).count(), 3);
        assert_eq!(ledger.legs(&b).count(), 3);
        assert_eq!(ledger.bracket_count(), 2);
    }
}
