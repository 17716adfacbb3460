//! Matching engine: crosses incoming orders against the resting book

use chrono::Utc;
use common::error::{Error, Result};
use common::model::book::BookSnapshot;
use common::model::order::{Order, OrderRequest, Side, Status};
use common::model::trade::Trade;
use common::units::{OrderId, Quantity};
use tracing::{debug, info};

use crate::order_book::OrderBook;

/// Which order's price a trade is recorded at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TradePricing {
    /// Record trades at the buy-side order's price, whichever of the pair
    /// was resting
    #[default]
    BuySide,
    /// Record trades at the resting (maker) order's price
    Maker,
}

/// Result of placing one order
#[derive(Debug)]
pub struct MatchingResult {
    /// The taker order after matching
    pub taker_order: Order,
    /// Trades that were generated, in execution order
    pub trades: Vec<Trade>,
}

/// The matching engine responsible for processing orders and generating
/// trades
///
/// One engine owns one book for one instrument. Every operation takes
/// `&mut self`; a host that accepts orders from several producers must
/// serialize the whole submit/match sequence, e.g. behind one lock per
/// instrument.
pub struct MatchingEngine {
    book: OrderBook,
    pricing: TradePricing,
}

impl MatchingEngine {
    /// Create a new matching engine for the given instrument
    pub fn new(market: impl Into<String>) -> Self {
        Self {
            book: OrderBook::new(market),
            pricing: TradePricing::default(),
        }
    }

    /// Create a new matching engine with an explicit trade pricing policy
    pub fn with_pricing(market: impl Into<String>, pricing: TradePricing) -> Self {
        Self {
            book: OrderBook::new(market),
            pricing,
        }
    }

    /// Read access to the book
    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    /// Admit and insert an order, returning the now-resting order
    ///
    /// The request is already validated by the caller; the quantity check
    /// here is a defensive re-check for direct invocations.
    pub fn submit(&mut self, request: &OrderRequest) -> Result<Order> {
        if request.quantity == 0 {
            return Err(Error::ValidationError(
                "order quantity must be positive".to_string(),
            ));
        }
        self.book.admit(request.id)?;
        let sequence = self.book.next_sequence();
        let order = Order::new(*request, sequence);
        self.book.insert(order.clone())?;
        debug!(
            "admitted order {} ({:?} {} @ {}) into {}",
            order.id, order.side, order.quantity, order.price, self.book.market
        );
        Ok(order)
    }

    /// Run matching for a just-inserted order
    ///
    /// Repeatedly crosses the order against the best resting order on the
    /// opposite side until the order is exhausted, the opposite side is
    /// empty, or the best opposite price no longer crosses. The returned
    /// trades are in execution order; callers must not reorder them.
    pub fn match_order(&mut self, order_id: OrderId) -> Result<Vec<Trade>> {
        let mut trades = Vec::new();
        loop {
            // The incoming order disappears from the book the moment it is
            // fully filled, which also terminates the loop.
            let Some(incoming) = self.book.get(order_id) else {
                break;
            };
            let incoming_side = incoming.side;
            let incoming_price = incoming.price;
            let incoming_remaining = incoming.remaining_quantity;
            if incoming_remaining == 0 {
                break;
            }

            let Some(resting) = self.book.peek_best(incoming_side.opposite()) else {
                break;
            };
            let resting_id = resting.id;
            let resting_price = resting.price;
            let resting_remaining = resting.remaining_quantity;

            // Relabel the pair by direction; crossing and the pricing
            // convention are stated in buy/sell terms.
            let (buy_id, buy_price, buy_remaining, sell_id, sell_price, sell_remaining) =
                match incoming_side {
                    Side::Buy => (
                        order_id,
                        incoming_price,
                        incoming_remaining,
                        resting_id,
                        resting_price,
                        resting_remaining,
                    ),
                    Side::Sell => (
                        resting_id,
                        resting_price,
                        resting_remaining,
                        order_id,
                        incoming_price,
                        incoming_remaining,
                    ),
                };
            if buy_price < sell_price {
                break;
            }

            let exchanged = Quantity::min(buy_remaining, sell_remaining);
            let incoming_after = self.book.apply_fill(order_id, exchanged)?;
            let resting_after = self.book.apply_fill(resting_id, exchanged)?;
            for filled in [&incoming_after, &resting_after] {
                if filled.remaining_quantity == 0 {
                    self.book.remove_filled(filled.id)?;
                }
            }

            let price = match self.pricing {
                TradePricing::BuySide => buy_price,
                TradePricing::Maker => resting_price,
            };
            info!(
                "executed trade on {}: buy {} / sell {} for {} @ {}",
                self.book.market, buy_id, sell_id, exchanged, price
            );
            trades.push(Trade::new(buy_id, sell_id, price, exchanged));
        }
        Ok(trades)
    }

    /// Process an incoming order: submit it, then match it
    pub fn place(&mut self, request: &OrderRequest) -> Result<MatchingResult> {
        let submitted = self.submit(request)?;
        let trades = self.match_order(submitted.id)?;
        // A fully filled taker has already left the book; reconstruct its
        // terminal state for the caller.
        let taker_order = match self.book.get(submitted.id) {
            Some(order) => order.clone(),
            None => {
                let mut filled = submitted;
                filled.filled_quantity = filled.quantity;
                filled.remaining_quantity = 0;
                filled.status = Status::Filled;
                filled.updated_at = Utc::now();
                filled
            }
        };
        Ok(MatchingResult { taker_order, trades })
    }

    /// Get a resting order by id
    pub fn get_order(&self, id: OrderId) -> Option<&Order> {
        self.book.get(id)
    }

    /// Serializable view of both book sides
    pub fn snapshot(&self) -> BookSnapshot {
        self.book.snapshot()
    }
}
