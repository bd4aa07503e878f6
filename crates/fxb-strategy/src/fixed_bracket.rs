use fxb_execution::{micros_to_price, ExecutionHost, OrderEvent};
use fxb_ledger::{BracketLedger, BracketPrices, FillOutcome};
use tracing::{debug, info};

use crate::{RecentBarsWindow, Slice, Strategy, StrategyError, StrategyRunReport, StrategySpec};

pub const STRATEGY_NAME: &str = "fixed_bracket";

/// Parameters for [`FixedBracketStrategy`]. Offsets and prices in micros.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedBracketParams {
    pub symbol: String,
    pub resolution_secs: i64,
    pub take_profit_offset_micros: i64,
    pub stop_loss_offset_micros: i64,
    pub quantity: i64,
    /// Bars kept in the recent-bars window.
    pub history_len: usize,
    /// Trade id RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for FixedBracketParams {
    fn default() -> Self {
        Self {
            symbol: "AUDUSD".to_string(),
            resolution_secs: 3600,
            take_profit_offset_micros: 3_000,
            stop_loss_offset_micros: 1_000,
            quantity: 1,
            history_len: 500,
            seed: None,
        }
    }
}

/// Opens one long bracket on every bar of the subscribed symbol: market entry
/// at the close, take-profit limit above, stop-loss stop below.
pub struct FixedBracketStrategy {
    params: FixedBracketParams,
    ledger: BracketLedger,
    history: RecentBarsWindow,
}

impl FixedBracketStrategy {
    pub fn new(params: FixedBracketParams) -> Self {
        let ledger = match params.seed {
            Some(seed) => BracketLedger::with_seed(params.symbol.clone(), seed),
            None => BracketLedger::new(params.symbol.clone()),
        };
        let history = RecentBarsWindow::new(params.history_len.max(1));
        Self {
            params,
            ledger,
            history,
        }
    }

    pub fn params(&self) -> &FixedBracketParams {
        &self.params
    }

    pub fn ledger(&self) -> &BracketLedger {
        &self.ledger
    }

    pub fn history(&self) -> &RecentBarsWindow {
        &self.history
    }
}

impl Strategy for FixedBracketStrategy {
    fn spec(&self) -> StrategySpec {
        StrategySpec::new(
            STRATEGY_NAME,
            self.params.symbol.clone(),
            self.params.resolution_secs,
        )
    }

    fn on_run_start(&mut self) {
        info!(
            symbol = %self.params.symbol,
            take_profit = micros_to_price(self.params.take_profit_offset_micros),
            stop_loss = micros_to_price(self.params.stop_loss_offset_micros),
            "Algorithm initialized."
        );
    }

    fn on_data(
        &mut self,
        slice: &Slice,
        host: &mut dyn ExecutionHost,
    ) -> Result<(), StrategyError> {
        let bar = slice
            .quote(&self.params.symbol)
            .ok_or_else(|| StrategyError::MissingQuote {
                symbol: self.params.symbol.clone(),
                time: slice.time,
            })?
            .clone();

        let prices = BracketPrices::from_offsets(
            bar.close_micros,
            self.params.take_profit_offset_micros,
            self.params.stop_loss_offset_micros,
        );
        let date = bar.time;
        self.history.push(bar);

        self.ledger
            .submit_bracket(host, date, prices, self.params.quantity)?;
        Ok(())
    }

    fn on_order_event(
        &mut self,
        event: &OrderEvent,
        host: &mut dyn ExecutionHost,
    ) -> Result<(), StrategyError> {
        let outcome = self
            .ledger
            .on_fill_notification(host, &event.order_id, event.status)?;
        if !matches!(outcome, FillOutcome::UnknownOrder | FillOutcome::NotAFill) {
            debug!(order_id = %event.order_id, outcome = ?outcome, "order event applied");
        }
        Ok(())
    }

    fn on_run_end(&mut self) -> StrategyRunReport {
        let summary = self.ledger.compute_run_summary();
        for line in summary.report_lines() {
            info!("{line}");
        }
        StrategyRunReport {
            strategy: STRATEGY_NAME.to_string(),
            summary,
            trades: self.ledger.records().to_vec(),
        }
    }
}
