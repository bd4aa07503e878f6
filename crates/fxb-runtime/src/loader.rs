//! Event script loader (deterministic).
//!
//! CSV format
//!
//! Header (all columns required, in any order):
//! `kind,time,symbol,open,high,low,close,order_id,status`
//!
//! - `kind = quote`: `time` (RFC 3339), `symbol`, `open`..`close` (decimal
//!   prices). `order_id`/`status` are left empty.
//! - `kind = order`: `order_id` and `status`
//!   (`submitted|partially_filled|filled|canceled|invalid`). `time` is
//!   optional; the price columns are ignored.
//!
//! Rows keep script order. Consecutive quote rows with the same `time` form
//! one slice. Lines starting with `#` are comments.

use std::path::Path;

use chrono::{DateTime, Utc};
use fxb_execution::{price_to_micros, OrderEvent, OrderStatus};
use fxb_strategy::{QuoteBar, Slice};
use serde::Deserialize;

/// One event pushed by the host, in replay order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostEvent {
    MarketData(Slice),
    OrderEvent(OrderEvent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    EmptyInput,
    MissingHeader(&'static str),
    BadRow { line: u64, reason: String },
    Csv(String),
    Io(String),
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e.to_string())
    }
}

impl From<csv::Error> for LoadError {
    fn from(e: csv::Error) -> Self {
        LoadError::Csv(e.to_string())
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::EmptyInput => write!(f, "empty input"),
            LoadError::MissingHeader(h) => write!(f, "missing header: {h}"),
            LoadError::BadRow { line, reason } => write!(f, "bad row at line {line}: {reason}"),
            LoadError::Csv(e) => write!(f, "csv error: {e}"),
            LoadError::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for LoadError {}

const REQUIRED_HEADERS: [&str; 9] = [
    "kind", "time", "symbol", "open", "high", "low", "close", "order_id", "status",
];

#[derive(Debug, Deserialize)]
struct EventRow {
    kind: String,
    time: Option<String>,
    symbol: Option<String>,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    order_id: Option<String>,
    status: Option<String>,
}

/// Load an event script from disk. Slices are stamped with `resolution_secs`.
pub fn load_events_csv(
    path: impl AsRef<Path>,
    resolution_secs: i64,
) -> Result<Vec<HostEvent>, LoadError> {
    let s = std::fs::read_to_string(path)?;
    parse_events_csv(&s, resolution_secs)
}

/// Parse an event script (pure, deterministic).
pub fn parse_events_csv(input: &str, resolution_secs: i64) -> Result<Vec<HostEvent>, LoadError> {
    let input = input.trim_start_matches('\u{feff}');
    if input.trim().is_empty() {
        return Err(LoadError::EmptyInput);
    }

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(input.as_bytes());

    let headers = rdr.headers()?.clone();
    for h in REQUIRED_HEADERS {
        if !headers.iter().any(|c| c == h) {
            return Err(LoadError::MissingHeader(h));
        }
    }

    let mut out: Vec<HostEvent> = Vec::new();
    let mut last_quote_time: Option<DateTime<Utc>> = None;

    for rec in rdr.records() {
        let rec = rec?;
        let line = rec.position().map(|p| p.line()).unwrap_or(0);
        let bad = |reason: String| LoadError::BadRow { line, reason };

        let row: EventRow = rec
            .deserialize(Some(&headers))
            .map_err(|e| bad(e.to_string()))?;

        match row.kind.to_ascii_lowercase().as_str() {
            "quote" => {
                let time = parse_time(row.time.as_deref()).map_err(bad)?;
                if let Some(prev) = last_quote_time {
                    if time < prev {
                        return Err(bad(format!("quote time {time} precedes {prev}")));
                    }
                }
                last_quote_time = Some(time);

                let bar = quote_bar(&row, time).map_err(bad)?;
                match out.last_mut() {
                    Some(HostEvent::MarketData(slice)) if slice.time == time => {
                        slice.insert(bar)
                    }
                    _ => out.push(HostEvent::MarketData(Slice::from_bar(bar, resolution_secs))),
                }
            }
            "order" => {
                let order_id = row
                    .order_id
                    .as_deref()
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| bad("order_id is empty".to_string()))?;
                let raw = row.status.as_deref().unwrap_or("");
                let status = OrderStatus::parse(raw)
                    .ok_or_else(|| bad(format!("unknown order status {raw:?}")))?;
                out.push(HostEvent::OrderEvent(OrderEvent::new(order_id, status)));
            }
            other => return Err(bad(format!("unknown kind {other:?}"))),
        }
    }

    Ok(out)
}

fn parse_time(raw: Option<&str>) -> Result<DateTime<Utc>, String> {
    let raw = raw.filter(|s| !s.is_empty()).ok_or("time is empty")?;
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("time {raw:?}: {e}"))
}

fn quote_bar(row: &EventRow, time: DateTime<Utc>) -> Result<QuoteBar, String> {
    let symbol = row
        .symbol
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or("symbol is empty")?;
    let micros = |v: Option<f64>, col: &str| -> Result<i64, String> {
        let p = v.ok_or_else(|| format!("{col} is empty"))?;
        price_to_micros(p).map_err(|e| format!("{col}: {e}"))
    };
    Ok(QuoteBar::new(
        symbol,
        time,
        micros(row.open, "open")?,
        micros(row.high, "high")?,
        micros(row.low, "low")?,
        micros(row.close, "close")?,
    ))
}
