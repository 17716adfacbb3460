//! Order models and related types

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::book::OrderSummary;
use crate::units::{OrderId, Price, Quantity, Sequence};
#[cfg(feature = "utoipa")]
use crate::utoipa::ToSchema;

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The side an order on this side matches against
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Parse a wire direction string, case-insensitively
impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(Error::ValidationError(format!(
                "unsupported order direction: {}",
                other
            ))),
        }
    }
}

/// Order kind
///
/// A closed set so the matching engine can handle each kind exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    /// Limit order to be executed at the specified price or better
    Limit,
}

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub enum Status {
    /// Order is in the book, not yet matched
    Resting,
    /// Order has been partially matched and remains in the book
    PartiallyFilled,
    /// Order has been matched completely and removed from the book
    Filled,
}

/// A validated order request, the single data shape the matching core
/// consumes. Produced by the validation layer; immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderRequest {
    /// Requested order id
    pub id: OrderId,
    /// Order side
    pub side: Side,
    /// Order kind
    pub kind: OrderKind,
    /// Limit price in the smallest price unit
    pub price: Price,
    /// Requested quantity, greater than zero
    pub quantity: Quantity,
}

/// Order model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order id
    pub id: OrderId,
    /// Order side
    pub side: Side,
    /// Order kind
    pub kind: OrderKind,
    /// Limit price in the smallest price unit
    pub price: Price,
    /// Original quantity
    pub quantity: Quantity,
    /// Remaining quantity, monotonically non-increasing
    pub remaining_quantity: Quantity,
    /// Cumulative matched quantity
    pub filled_quantity: Quantity,
    /// Admission counter, used only as a time-priority tie-break
    pub sequence: Sequence,
    /// Current status
    pub status: Status,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Create a resting order from an admitted request
    pub fn new(request: OrderRequest, sequence: Sequence) -> Self {
        let now = Utc::now();
        Self {
            id: request.id,
            side: request.side,
            kind: request.kind,
            price: request.price,
            quantity: request.quantity,
            remaining_quantity: request.quantity,
            filled_quantity: 0,
            sequence,
            status: Status::Resting,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the order is fully filled
    pub fn is_filled(&self) -> bool {
        self.remaining_quantity == 0
    }

    /// Summarize the order for the book view
    pub fn overview(&self) -> OrderSummary {
        OrderSummary {
            id: self.id,
            quantity: self.remaining_quantity,
            price: self.price,
        }
    }
}
