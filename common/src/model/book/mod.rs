//! Serializable order book views

use serde::{Deserialize, Serialize};

use crate::units::{OrderId, Price, Quantity};
#[cfg(feature = "utoipa")]
use crate::utoipa::ToSchema;

/// A resting order as it appears in the book view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct OrderSummary {
    /// Order id
    pub id: OrderId,
    /// Remaining quantity
    pub quantity: Quantity,
    /// Limit price
    pub price: Price,
}

/// Snapshot of both book sides in priority order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BookSnapshot {
    /// Buy orders, best (highest) price first
    pub buy_orders: Vec<OrderSummary>,
    /// Sell orders, best (lowest) price first
    pub sell_orders: Vec<OrderSummary>,
}
