//! Trade models and related types

use serde::{Deserialize, Serialize};

use crate::units::{OrderId, Price, Quantity};
#[cfg(feature = "utoipa")]
use crate::utoipa::ToSchema;

/// Trade record emitted for a single match step
///
/// The wire shape is stable: `{buyOrderId, sellOrderId, price, quantity}`.
/// Trades are not stored; downstream ledgers replay them in the order they
/// were executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    /// Id of the buy-side order of the pair
    pub buy_order_id: OrderId,
    /// Id of the sell-side order of the pair
    pub sell_order_id: OrderId,
    /// Price the trade is recorded at
    pub price: Price,
    /// Quantity exchanged in this match step
    pub quantity: Quantity,
}

impl Trade {
    /// Create a new trade from a matched pair
    pub fn new(buy_order_id: OrderId, sell_order_id: OrderId, price: Price, quantity: Quantity) -> Self {
        Self {
            buy_order_id,
            sell_order_id,
            price,
            quantity,
        }
    }
}
