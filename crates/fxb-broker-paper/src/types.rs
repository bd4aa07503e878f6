use fxb_execution::{OrderId, OrderKind, OrderStatus};

/// An order as the paper host tracks it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaperOrder {
    pub order_id: OrderId,
    pub kind: OrderKind,
    pub symbol: String,
    pub quantity: i64,
    /// Limit or stop price; `None` for market orders.
    pub price_micros: Option<i64>,
    pub status: OrderStatus,
}

/// One command as received, in arrival order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaperCommand {
    Submit(OrderId),
    Cancel(OrderId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaperHostError {
    ZeroQuantity,
    /// Limit/stop price must be positive.
    NonPositivePrice { kind: OrderKind, price_micros: i64 },
    UnknownOrder(OrderId),
    /// Cancel or status change on an order that is already final.
    OrderTerminal {
        order_id: OrderId,
        status: OrderStatus,
    },
}

impl std::fmt::Display for PaperHostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroQuantity => write!(f, "paper host: quantity must be non-zero"),
            Self::NonPositivePrice { kind, price_micros } => {
                write!(f, "paper host: {kind} price must be positive (got {price_micros} micros)")
            }
            Self::UnknownOrder(id) => write!(f, "paper host: unknown order {id}"),
            Self::OrderTerminal { order_id, status } => write!(
                f,
                "paper host: order {order_id} already {}",
                status.as_str()
            ),
        }
    }
}

impl std::error::Error for PaperHostError {}
