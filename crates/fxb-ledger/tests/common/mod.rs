#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use fxb_execution::{ExecutionHost, HostResult, OrderId, OrderKind};

/// One command as the host saw it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostCommand {
    Submit {
        order_id: OrderId,
        kind: OrderKind,
        symbol: String,
        quantity: i64,
        price_micros: Option<i64>,
    },
    Cancel(OrderId),
}

/// Host double: sequential ids, records every command, optional failures.
#[derive(Default)]
pub struct RecordingHost {
    next: u64,
    pub commands: Vec<HostCommand>,
    pub reject_kind: Option<OrderKind>,
    pub reject_cancels: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancels(&self) -> Vec<OrderId> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                HostCommand::Cancel(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn submits(&self) -> Vec<&HostCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, HostCommand::Submit { .. }))
            .collect()
    }

    fn submit(
        &mut self,
        kind: OrderKind,
        symbol: &str,
        quantity: i64,
        price_micros: Option<i64>,
    ) -> HostResult<OrderId> {
        if self.reject_kind == Some(kind) {
            return Err(format!("{kind} orders disabled").into());
        }
        self.next += 1;
        let order_id = OrderId::new(format!("{}", self.next));
        self.commands.push(HostCommand::Submit {
            order_id: order_id.clone(),
            kind,
            symbol: symbol.to_string(),
            quantity,
            price_micros,
        });
        Ok(order_id)
    }
}

impl ExecutionHost for RecordingHost {
    fn submit_market_order(&mut self, symbol: &str, quantity: i64) -> HostResult<OrderId> {
        self.submit(OrderKind::Market, symbol, quantity, None)
    }

    fn submit_limit_order(
        &mut self,
        symbol: &str,
        quantity: i64,
        limit_price_micros: i64,
    ) -> HostResult<OrderId> {
        self.submit(OrderKind::Limit, symbol, quantity, Some(limit_price_micros))
    }

    fn submit_stop_order(
        &mut self,
        symbol: &str,
        quantity: i64,
        stop_price_micros: i64,
    ) -> HostResult<OrderId> {
        self.submit(OrderKind::Stop, symbol, quantity, Some(stop_price_micros))
    }

    fn cancel_order(&mut self, order_id: &OrderId) -> HostResult<()> {
        if self.reject_cancels {
            return Err(format!("cancel refused for {order_id}").into());
        }
        self.commands.push(HostCommand::Cancel(order_id.clone()));
        Ok(())
    }
}

pub fn bar_time(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 1, 4, hour, 0, 0).unwrap()
}
