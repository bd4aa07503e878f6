//! Deterministic in-memory paper host.
//!
//! - Order ids are sequential: `ORD-000001`, `ORD-000002`, ...
//! - Every submit and cancel is recorded in arrival order.
//! - No matching and no fills. Order status changes only through
//!   [`PaperHost::cancel_order`] or [`PaperHost::apply_order_event`], which
//!   the replay session calls for each scripted order event.
//! - No randomness. No timestamps.

use std::collections::BTreeMap;

use fxb_execution::{ExecutionHost, HostResult, OrderEvent, OrderId, OrderKind, OrderStatus};

mod types;

pub use types::{PaperCommand, PaperHostError, PaperOrder};

#[derive(Clone, Debug, Default)]
pub struct PaperHost {
    next_seq: u64,
    orders: BTreeMap<OrderId, PaperOrder>,
    commands: Vec<PaperCommand>,
}

impl PaperHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic listing: ids are zero-padded so map order is submit order.
    pub fn orders(&self) -> impl Iterator<Item = &PaperOrder> {
        self.orders.values()
    }

    pub fn order(&self, order_id: &OrderId) -> Option<&PaperOrder> {
        self.orders.get(order_id)
    }

    pub fn commands(&self) -> &[PaperCommand] {
        &self.commands
    }

    /// Orders not yet filled, canceled or invalid.
    pub fn open_orders(&self) -> Vec<&PaperOrder> {
        self.orders
            .values()
            .filter(|o| !o.status.is_terminal())
            .collect()
    }

    /// Record a status reported for `event.order_id`.
    ///
    /// # Errors
    /// [`PaperHostError::UnknownOrder`] if the id was never issued here,
    /// [`PaperHostError::OrderTerminal`] if the order is already final (the
    /// stored status is kept).
    pub fn apply_order_event(&mut self, event: &OrderEvent) -> Result<(), PaperHostError> {
        let order = self
            .orders
            .get_mut(&event.order_id)
            .ok_or_else(|| PaperHostError::UnknownOrder(event.order_id.clone()))?;
        if order.status.is_terminal() {
            return Err(PaperHostError::OrderTerminal {
                order_id: order.order_id.clone(),
                status: order.status,
            });
        }
        order.status = event.status;
        Ok(())
    }

    pub fn mark_filled(&mut self, order_id: &OrderId) -> Result<(), PaperHostError> {
        self.apply_order_event(&OrderEvent::new(order_id.as_str(), OrderStatus::Filled))
    }

    fn submit(
        &mut self,
        kind: OrderKind,
        symbol: &str,
        quantity: i64,
        price_micros: Option<i64>,
    ) -> Result<OrderId, PaperHostError> {
        if quantity == 0 {
            return Err(PaperHostError::ZeroQuantity);
        }
        if let Some(p) = price_micros {
            if p <= 0 {
                return Err(PaperHostError::NonPositivePrice {
                    kind,
                    price_micros: p,
                });
            }
        }

        self.next_seq += 1;
        let order_id = OrderId::new(format!("ORD-{:06}", self.next_seq));
        self.orders.insert(
            order_id.clone(),
            PaperOrder {
                order_id: order_id.clone(),
                kind,
                symbol: symbol.to_string(),
                quantity,
                price_micros,
                status: OrderStatus::Submitted,
            },
        );
        self.commands.push(PaperCommand::Submit(order_id.clone()));
        Ok(order_id)
    }
}

impl ExecutionHost for PaperHost {
    fn submit_market_order(&mut self, symbol: &str, quantity: i64) -> HostResult<OrderId> {
        Ok(self.submit(OrderKind::Market, symbol, quantity, None)?)
    }

    fn submit_limit_order(
        &mut self,
        symbol: &str,
        quantity: i64,
        limit_price_micros: i64,
    ) -> HostResult<OrderId> {
        Ok(self.submit(OrderKind::Limit, symbol, quantity, Some(limit_price_micros))?)
    }

    fn submit_stop_order(
        &mut self,
        symbol: &str,
        quantity: i64,
        stop_price_micros: i64,
    ) -> HostResult<OrderId> {
        Ok(self.submit(OrderKind::Stop, symbol, quantity, Some(stop_price_micros))?)
    }

    fn cancel_order(&mut self, order_id: &OrderId) -> HostResult<()> {
        let order = self
            .orders
            .get_mut(order_id)
            .ok_or_else(|| PaperHostError::UnknownOrder(order_id.clone()))?;
        if order.status.is_terminal() {
            return Err(PaperHostError::OrderTerminal {
                order_id: order_id.clone(),
                status: order.status,
            }
            .into());
        }
        order.status = OrderStatus::Canceled;
        self.commands.push(PaperCommand::Cancel(order_id.clone()));
        Ok(())
    }
}
