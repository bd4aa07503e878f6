//! fxb-execution
//!
//! Command/event surface between the strategy and the execution host.
//!
//! - The host (platform, paper host, test mock) implements [`ExecutionHost`].
//! - Strategies and the bracket ledger only ever talk to the host through it.
//! - Order lifecycle notifications flow back as [`OrderEvent`]s.
//!
//! Prices are integer micros everywhere on this surface; see [`prices`].

mod host;
mod types;

pub mod prices;

pub use host::{ExecutionHost, HostResult};
pub use prices::{micros_to_price, price_to_micros, PricingError, MICROS_PER_UNIT};
pub use types::{OrderEvent, OrderId, OrderKind, OrderStatus};
