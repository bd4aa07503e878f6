//! fxb-ledger
//!
//! Bracket order ledger: the one piece of state the strategy owns.
//!
//! - Each bracket is three linked legs (entry, take-profit, stop-loss)
//!   sharing a random [`TradeId`].
//! - Records are append-only; fills and cancels mutate status in place.
//! - A filled exit leg cancels its sibling at the host, exactly once.
//! - [`BracketLedger::compute_run_summary`] is a pure read over the table.
//!
//! No IO, no clock. Randomness is confined to trade-id generation and can be
//! seeded for reproducible runs.

mod ledger;
mod trade_id;
mod types;

pub use ledger::{BracketLedger, FillOutcome, LedgerError};
pub use trade_id::{TradeId, TRADE_ID_CHARSET, TRADE_ID_LEN};
pub use types::{BracketPrices, LegStatus, LegType, RunSummary, TradeRecord};
