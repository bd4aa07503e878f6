use std::fmt;

use serde::{Deserialize, Serialize};

/// Host-assigned order identifier. Opaque to everything except the host.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Order types the strategy submits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    Market,
    Limit,
    Stop,
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKind::Market => write!(f, "MARKET"),
            OrderKind::Limit => write!(f, "LIMIT"),
            OrderKind::Stop => write!(f, "STOP"),
        }
    }
}

/// Order status as reported by the host in an order event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Submitted,
    PartiallyFilled,
    Filled,
    Canceled,
    Invalid,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Filled | Self::Canceled | Self::Invalid)
    }

    /// Parse the lowercase wire form used in event scripts.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "submitted" => Some(Self::Submitted),
            "partially_filled" => Some(Self::PartiallyFilled),
            "filled" => Some(Self::Filled),
            "canceled" | "cancelled" => Some(Self::Canceled),
            "invalid" => Some(Self::Invalid),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::PartiallyFilled => "partially_filled",
            Self::Filled => "filled",
            Self::Canceled => "canceled",
            Self::Invalid => "invalid",
        }
    }
}

/// Order lifecycle notification pushed by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderEvent {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

impl OrderEvent {
    pub fn new(order_id: impl Into<String>, status: OrderStatus) -> Self {
        Self {
            order_id: OrderId::new(order_id),
            status,
        }
    }

    pub fn filled(order_id: impl Into<String>) -> Self {
        Self::new(order_id, OrderStatus::Filled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_parses_wire_form() {
        assert_eq!(OrderStatus::parse("filled"), Some(OrderStatus::Filled));
        assert_eq!(OrderStatus::parse(" Filled "), Some(OrderStatus::Filled));
        assert_eq!(
            OrderStatus::parse("partially_filled"),
            Some(OrderStatus::PartiallyFilled)
        );
        assert_eq!(OrderStatus::parse("cancelled"), Some(OrderStatus::Canceled));
        assert_eq!(OrderStatus::parse("done"), None);
    }

    #[test]
    fn order_status_wire_form_is_stable() {
        for s in [
            OrderStatus::Submitted,
            OrderStatus::PartiallyFilled,
            OrderStatus::Filled,
            OrderStatus::Canceled,
            OrderStatus::Invalid,
        ] {
            assert_eq!(OrderStatus::parse(s.as_str()), Some(s));
        }
    }

    #[test]
    fn only_fill_cancel_invalid_are_terminal() {
        assert!(OrderStatus::Filled.is_terminal());
        assert!(OrderStatus::Canceled.is_terminal());
        assert!(OrderStatus::Invalid.is_terminal());
        assert!(!OrderStatus::Submitted.is_terminal());
        assert!(!OrderStatus::PartiallyFilled.is_terminal());
    }

    #[test]
    fn order_id_displays_raw() {
        let id = OrderId::new("ORD-000007");
        assert_eq!(id.to_string(), "ORD-000007");
        assert_eq!(id.as_str(), "ORD-000007");
    }
}
