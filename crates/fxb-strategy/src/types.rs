use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use fxb_ledger::{LedgerError, RunSummary, TradeRecord};

/// One quote bar (mid OHLC) for a symbol, prices in micros.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuoteBar {
    pub symbol: String,
    /// Bar time as reported by the host.
    pub time: DateTime<Utc>,
    pub open_micros: i64,
    pub high_micros: i64,
    pub low_micros: i64,
    pub close_micros: i64,
}

impl QuoteBar {
    pub fn new(
        symbol: impl Into<String>,
        time: DateTime<Utc>,
        open_micros: i64,
        high_micros: i64,
        low_micros: i64,
        close_micros: i64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            time,
            open_micros,
            high_micros,
            low_micros,
            close_micros,
        }
    }
}

/// Everything the host delivers at one point in time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slice {
    pub time: DateTime<Utc>,
    pub resolution_secs: i64,
    quotes: BTreeMap<String, QuoteBar>,
}

impl Slice {
    pub fn new(time: DateTime<Utc>, resolution_secs: i64) -> Self {
        Self {
            time,
            resolution_secs,
            quotes: BTreeMap::new(),
        }
    }

    /// Single-bar slice stamped with the bar's own time.
    pub fn from_bar(bar: QuoteBar, resolution_secs: i64) -> Self {
        let mut s = Self::new(bar.time, resolution_secs);
        s.insert(bar);
        s
    }

    /// Adds or replaces the bar for `bar.symbol`.
    pub fn insert(&mut self, bar: QuoteBar) {
        self.quotes.insert(bar.symbol.clone(), bar);
    }

    pub fn quote(&self, symbol: &str) -> Option<&QuoteBar> {
        self.quotes.get(symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.quotes.keys().map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

/// Bounded recent-bars window; keeps the most recent `max_len` bars.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecentBarsWindow {
    max_len: usize,
    bars: Vec<QuoteBar>,
}

impl RecentBarsWindow {
    pub fn new(max_len: usize) -> Self {
        debug_assert!(max_len > 0);
        Self {
            max_len,
            bars: Vec::with_capacity(max_len),
        }
    }

    pub fn push(&mut self, bar: QuoteBar) {
        self.bars.push(bar);
        if self.bars.len() > self.max_len {
            let start = self.bars.len() - self.max_len;
            self.bars.drain(..start);
        }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&QuoteBar> {
        self.bars.last()
    }

    pub fn bars(&self) -> &[QuoteBar] {
        &self.bars
    }
}

/// Errors raised inside strategy hooks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StrategyError {
    /// The slice had no bar for the subscribed symbol.
    MissingQuote {
        symbol: String,
        time: DateTime<Utc>,
    },
    Ledger(LedgerError),
}

impl std::fmt::Display for StrategyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyError::MissingQuote { symbol, time } => {
                write!(f, "no quote for {symbol} in slice at {time}")
            }
            StrategyError::Ledger(e) => write!(f, "ledger: {e}"),
        }
    }
}

impl std::error::Error for StrategyError {}

impl From<LedgerError> for StrategyError {
    fn from(e: LedgerError) -> Self {
        StrategyError::Ledger(e)
    }
}

/// Host-level policy errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StrategyHostError {
    MultiStrategyNotAllowed,
    NoStrategyRegistered,
    ResolutionMismatch { expected_secs: i64, got_secs: i64 },
    /// Data or order event outside `on_run_start` .. `on_run_end`.
    NotRunning,
    /// `start` called on a host that already started.
    AlreadyStarted,
    Strategy(StrategyError),
}

impl std::fmt::Display for StrategyHostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MultiStrategyNotAllowed => write!(f, "only one strategy may be registered"),
            Self::NoStrategyRegistered => write!(f, "no strategy registered"),
            Self::ResolutionMismatch {
                expected_secs,
                got_secs,
            } => write!(
                f,
                "slice resolution {got_secs}s does not match strategy resolution {expected_secs}s"
            ),
            Self::NotRunning => write!(f, "strategy host is not running"),
            Self::AlreadyStarted => write!(f, "strategy host already started"),
            Self::Strategy(e) => write!(f, "strategy: {e}"),
        }
    }
}

impl std::error::Error for StrategyHostError {}

impl From<StrategyError> for StrategyHostError {
    fn from(e: StrategyError) -> Self {
        StrategyHostError::Strategy(e)
    }
}

/// What a strategy hands back at the end of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct StrategyRunReport {
    pub strategy: String,
    pub summary: RunSummary,
    pub trades: Vec<TradeRecord>,
}
