//! fxb-strategy
//!
//! Strategy lifecycle contract and the single-strategy host.
//!
//! - The platform pushes four kinds of events: run start, data slice, order
//!   event, run end. [`Strategy`] has one hook per kind.
//! - Hooks that trade receive the execution host as `&mut dyn ExecutionHost`;
//!   a strategy has no other route to the platform.
//! - [`StrategyHost`] holds exactly one strategy and enforces lifecycle order
//!   and the declared data resolution.
//! - [`FixedBracketStrategy`] is the shipped rule set: a bracket on every bar.

mod fixed_bracket;
mod host;
mod types;

pub use fixed_bracket::{FixedBracketParams, FixedBracketStrategy, STRATEGY_NAME};
pub use host::{HostPhase, StrategyHost};
pub use types::*;

use fxb_execution::{ExecutionHost, OrderEvent};

/// Strategy identity and subscription.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrategySpec {
    pub name: String,
    /// The one instrument the strategy subscribes to.
    pub symbol: String,
    /// Bar resolution in seconds (3600 for hourly).
    pub resolution_secs: i64,
}

impl StrategySpec {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, resolution_secs: i64) -> Self {
        debug_assert!(resolution_secs > 0);
        Self {
            name: name.into(),
            symbol: symbol.into(),
            resolution_secs,
        }
    }
}

/// Callback contract between the host platform and a strategy.
pub trait Strategy: Send {
    fn spec(&self) -> StrategySpec;

    fn on_run_start(&mut self) {}

    /// New market data. The slice's resolution has already been checked
    /// against [`StrategySpec::resolution_secs`].
    fn on_data(
        &mut self,
        slice: &Slice,
        host: &mut dyn ExecutionHost,
    ) -> Result<(), StrategyError>;

    fn on_order_event(
        &mut self,
        event: &OrderEvent,
        host: &mut dyn ExecutionHost,
    ) -> Result<(), StrategyError>;

    /// End of run: final statistics and the trade table.
    fn on_run_end(&mut self) -> StrategyRunReport;
}
