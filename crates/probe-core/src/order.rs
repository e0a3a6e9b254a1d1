//! Order value objects and request identifiers.
//!
//! Order identifiers and ticker identifiers are separate namespaces; the
//! newtypes keep them from being mixed up at call sites.

use crate::error::{CoreError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier for an order, assigned by the client and echoed by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(i64);

impl OrderId {
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a market data request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TickerId(i64);

impl TickerId {
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TickerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order side: buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderSide {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    #[serde(rename = "LMT")]
    Limit,
    #[serde(rename = "MKT")]
    Market,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limit => write!(f, "LMT"),
            Self::Market => write!(f, "MKT"),
        }
    }
}

/// Gateway-reported order lifecycle status.
///
/// Wire messages carry the status as a string; `FromStr` maps the fixed set
/// of gateway spellings onto this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    PendingSubmit,
    PendingCancel,
    PreSubmitted,
    Submitted,
    Cancelled,
    Filled,
    Inactive,
}

impl OrderStatus {
    /// True for statuses that acknowledge a placement (working at the gateway).
    #[must_use]
    pub fn is_acknowledged(&self) -> bool {
        matches!(self, Self::PreSubmitted | Self::Submitted)
    }

    /// True once the gateway confirms the order is cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PendingSubmit" => Ok(Self::PendingSubmit),
            "PendingCancel" => Ok(Self::PendingCancel),
            "PreSubmitted" => Ok(Self::PreSubmitted),
            "Submitted" => Ok(Self::Submitted),
            "Cancelled" => Ok(Self::Cancelled),
            "Filled" => Ok(Self::Filled),
            "Inactive" => Ok(Self::Inactive),
            other => Err(CoreError::UnknownOrderStatus(other.to_string())),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::PendingSubmit => "PendingSubmit",
            Self::PendingCancel => "PendingCancel",
            Self::PreSubmitted => "PreSubmitted",
            Self::Submitted => "Submitted",
            Self::Cancelled => "Cancelled",
            Self::Filled => "Filled",
            Self::Inactive => "Inactive",
        };
        write!(f, "{s}")
    }
}

/// Fixed-shape order parameters carried into a place-order request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Buy or sell.
    pub side: OrderSide,
    /// Limit or market.
    pub order_type: OrderType,
    /// Total quantity, must be positive.
    pub quantity: i64,
    /// Limit price, must be positive for limit orders.
    pub limit_price: Decimal,
}

impl Order {
    /// Create a validated limit order.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidQuantity` for non-positive quantities and
    /// `CoreError::InvalidPrice` for non-positive limit prices.
    pub fn limit(side: OrderSide, quantity: i64, limit_price: Decimal) -> Result<Self> {
        if quantity <= 0 {
            return Err(CoreError::InvalidQuantity(quantity));
        }
        if limit_price <= Decimal::ZERO {
            return Err(CoreError::InvalidPrice(limit_price.to_string()));
        }
        Ok(Self {
            side,
            order_type: OrderType::Limit,
            quantity,
            limit_price,
        })
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} @ {}",
            self.side, self.quantity, self.order_type, self.limit_price
        )
    }
}
