//! The execution host: everything the strategy is allowed to ask of the
//! platform.
//!
//! The platform owns order routing, matching and fill simulation. This crate
//! only fixes the command surface. Implementations include the paper host in
//! `fxb-broker-paper` and the recording mocks used in tests.

use crate::types::OrderId;

/// Result alias for host commands.
pub type HostResult<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Commands a strategy may issue to its host.
///
/// Quantities are signed: positive buys, negative sells. Prices are integer
/// micros. Every submit returns the host-assigned [`OrderId`]; the host
/// later reports that order's lifecycle as `OrderEvent`s.
pub trait ExecutionHost {
    fn submit_market_order(&mut self, symbol: &str, quantity: i64) -> HostResult<OrderId>;

    fn submit_limit_order(
        &mut self,
        symbol: &str,
        quantity: i64,
        limit_price_micros: i64,
    ) -> HostResult<OrderId>;

    fn submit_stop_order(
        &mut self,
        symbol: &str,
        quantity: i64,
        stop_price_micros: i64,
    ) -> HostResult<OrderId>;

    fn cancel_order(&mut self, order_id: &OrderId) -> HostResult<()>;
}

impl<H: ExecutionHost + ?Sized> ExecutionHost for &mut H {
    fn submit_market_order(&mut self, symbol: &str, quantity: i64) -> HostResult<OrderId> {
        (**self).submit_market_order(symbol, quantity)
    }

    fn submit_limit_order(
        &mut self,
        symbol: &str,
        quantity: i64,
        limit_price_micros: i64,
    ) -> HostResult<OrderId> {
        (**self).submit_limit_order(symbol, quantity, limit_price_micros)
    }

    fn submit_stop_order(
        &mut self,
        symbol: &str,
        quantity: i64,
        stop_price_micros: i64,
    ) -> HostResult<OrderId> {
        (**self).submit_stop_order(symbol, quantity, stop_price_micros)
    }

    fn cancel_order(&mut self, order_id: &OrderId) -> HostResult<()> {
        (**self).cancel_order(order_id)
    }
}
