//! Order status and provider status mapping.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Currency of every order created by the store.
pub const DEFAULT_CURRENCY: &str = "BRL";

/// Lifecycle status of an order.
///
/// Wire and storage format: `PENDING`, `PAID`, `CANCELED`, `REFUNDED`.
/// Transitions are not enforced; the latest webhook wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Paid,
    Canceled,
    Refunded,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Canceled => "CANCELED",
            Self::Refunded => "REFUNDED",
        }
    }

    /// Map a Mercado Pago payment status to an order status.
    ///
    /// `approved` is PAID, `rejected` and `cancelled` are CANCELED, anything
    /// else (including a missing status) is PENDING. Never yields REFUNDED.
    pub fn from_provider_status(status: Option<&str>) -> Self {
        match status {
            Some("approved") => Self::Paid,
            Some("rejected") | Some("cancelled") => Self::Canceled,
            _ => Self::Pending,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown order status: {0}")]
pub struct UnknownOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "PAID" => Ok(Self::Paid),
            "CANCELED" => Ok(Self::Canceled),
            "REFUNDED" => Ok(Self::Refunded),
            other => Err(UnknownOrderStatus(other.to_owned())),
        }
    }
}
