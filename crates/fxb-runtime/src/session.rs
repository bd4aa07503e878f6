use chrono::{DateTime, Utc};
use fxb_broker_paper::PaperHost;
use fxb_execution::{ExecutionHost, OrderEvent};
use fxb_ledger::{RunSummary, TradeRecord};
use fxb_strategy::{Strategy, StrategyHost, StrategyHostError};
use tracing::{info, warn};

use crate::loader::HostEvent;

/// An execution host the session can replay order events into before the
/// strategy sees them.
pub trait ReplayHost: ExecutionHost {
    fn record_order_event(&mut self, _event: &OrderEvent) {}
}

impl ReplayHost for PaperHost {
    fn record_order_event(&mut self, event: &OrderEvent) {
        if let Err(e) = self.apply_order_event(event) {
            warn!(order_id = %event.order_id, status = event.status.as_str(), "paper host: {e}");
        }
    }
}

/// Optional `[start, end)` bound on quote times.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplayWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl ReplayWindow {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| t >= s) && self.end.map_or(true, |e| t < e)
    }
}

/// Session setup/teardown errors. Errors raised while replaying events halt
/// the session and are reported in [`SessionReport`] instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// `start >= end`.
    EmptyWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    Host(StrategyHostError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::EmptyWindow { start, end } => {
                write!(f, "replay window is empty: start {start} is not before end {end}")
            }
            SessionError::Host(e) => write!(f, "strategy host: {e}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<StrategyHostError> for SessionError {
    fn from(e: StrategyHostError) -> Self {
        SessionError::Host(e)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionReport {
    pub strategy: String,
    /// Whether replay stopped early.
    pub halted: bool,
    pub halt_reason: Option<String>,
    pub events_processed: usize,
    /// Quote events outside the replay window.
    pub events_skipped: usize,
    pub summary: RunSummary,
    pub trades: Vec<TradeRecord>,
}

/// Replays a host event script against one strategy.
///
/// Pipeline: START -> (QUOTE | ORDER EVENT)* -> END
///
/// The first event error halts replay. `on_run_end` still runs so the report
/// carries the table as it stood.
pub struct Session {
    host: StrategyHost,
    window: ReplayWindow,
}

impl Session {
    pub fn new(strategy: Box<dyn Strategy>, window: ReplayWindow) -> Result<Self, SessionError> {
        if let (Some(start), Some(end)) = (window.start, window.end) {
            if start >= end {
                return Err(SessionError::EmptyWindow { start, end });
            }
        }
        let mut host = StrategyHost::new();
        host.register(strategy)?;
        Ok(Self { host, window })
    }

    pub fn window(&self) -> ReplayWindow {
        self.window
    }

    pub fn run<H: ReplayHost>(
        &mut self,
        events: &[HostEvent],
        exec: &mut H,
    ) -> Result<SessionReport, SessionError> {
        let spec = self.host.spec()?;
        self.host.start()?;

        let mut events_processed = 0;
        let mut events_skipped = 0;
        let mut halt_reason: Option<String> = None;

        for event in events {
            let res = match event {
                HostEvent::MarketData(slice) => {
                    if !self.window.contains(slice.time) {
                        events_skipped += 1;
                        continue;
                    }
                    self.host.on_data(slice, &mut *exec)
                }
                HostEvent::OrderEvent(ev) => {
                    exec.record_order_event(ev);
                    self.host.on_order_event(ev, &mut *exec)
                }
            };
            events_processed += 1;

            if let Err(e) = res {
                warn!(error = %e, "session halted");
                halt_reason = Some(e.to_string());
                break;
            }
        }

        let report = self.host.finish()?;
        info!(
            strategy = %spec.name,
            events_processed,
            events_skipped,
            halted = halt_reason.is_some(),
            "session finished"
        );

        Ok(SessionReport {
            strategy: report.strategy,
            halted: halt_reason.is_some(),
            halt_reason,
            events_processed,
            events_skipped,
            summary: report.summary,
            trades: report.trades,
        })
    }
}
