//! fxb-runtime
//!
//! Replays a host event script against a strategy.
//!
//! - `loader`: event CSV -> [`HostEvent`]s, in script order.
//! - `session`: drives `StrategyHost` through run start, each event, run end,
//!   and reports the trade table and summary. First error halts.

mod loader;
mod session;

pub use loader::{load_events_csv, parse_events_csv, HostEvent, LoadError};
pub use session::{ReplayHost, ReplayWindow, Session, SessionError, SessionReport};
