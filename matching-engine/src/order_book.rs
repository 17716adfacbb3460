//! Order book implementation for price-time priority matching

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use chrono::Utc;
use common::error::{Error, Result};
use common::model::book::BookSnapshot;
use common::model::order::{Order, Side, Status};
use common::units::{OrderId, Price, Quantity, Sequence};
use tracing::debug;

/// The buy side of the order book (bids)
///
/// Price levels are kept in a `BTreeMap`; the best bid is the highest price,
/// so lookups walk the map from the back. Within a level, order ids queue in
/// admission order.
pub struct BidSide {
    levels: BTreeMap<Price, VecDeque<OrderId>>,
}

impl BidSide {
    /// Create a new empty bid side
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }
}

impl Default for BidSide {
    fn default() -> Self {
        Self::new()
    }
}

/// The sell side of the order book (asks)
///
/// The best ask is the lowest price, so lookups walk the map from the front.
pub struct AskSide {
    levels: BTreeMap<Price, VecDeque<OrderId>>,
}

impl AskSide {
    /// Create a new empty ask side
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }
}

impl Default for AskSide {
    fn default() -> Self {
        Self::new()
    }
}

/// Common trait for order book sides
pub trait OrderBookSide {
    /// Queue an order id at its price level, behind all earlier arrivals
    fn enqueue(&mut self, price: Price, id: OrderId);

    /// Remove an order id from its price level. Returns false if absent.
    fn dequeue(&mut self, price: Price, id: OrderId) -> bool;

    /// The id of the highest-priority order on this side
    fn best(&self) -> Option<OrderId>;

    /// The best price on this side
    fn best_price(&self) -> Option<Price>;

    /// Number of resting orders on this side
    fn len(&self) -> usize;

    /// Whether this side has no resting orders
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All order ids on this side, in priority order
    fn ids(&self) -> Vec<OrderId>;
}

fn dequeue_from(levels: &mut BTreeMap<Price, VecDeque<OrderId>>, price: Price, id: OrderId) -> bool {
    let Some(queue) = levels.get_mut(&price) else {
        return false;
    };
    let Some(position) = queue.iter().position(|&queued| queued == id) else {
        return false;
    };
    queue.remove(position);
    // Clean up empty price levels
    if queue.is_empty() {
        levels.remove(&price);
    }
    true
}

impl OrderBookSide for BidSide {
    fn enqueue(&mut self, price: Price, id: OrderId) {
        self.levels.entry(price).or_default().push_back(id);
    }

    fn dequeue(&mut self, price: Price, id: OrderId) -> bool {
        dequeue_from(&mut self.levels, price, id)
    }

    fn best(&self) -> Option<OrderId> {
        self.levels
            .iter()
            .next_back()
            .and_then(|(_, queue)| queue.front().copied())
    }

    fn best_price(&self) -> Option<Price> {
        self.levels.keys().next_back().copied()
    }

    fn len(&self) -> usize {
        self.levels.values().map(VecDeque::len).sum()
    }

    fn ids(&self) -> Vec<OrderId> {
        self.levels
            .iter()
            .rev()
            .flat_map(|(_, queue)| queue.iter().copied())
            .collect()
    }
}

impl OrderBookSide for AskSide {
    fn enqueue(&mut self, price: Price, id: OrderId) {
        self.levels.entry(price).or_default().push_back(id);
    }

    fn dequeue(&mut self, price: Price, id: OrderId) -> bool {
        dequeue_from(&mut self.levels, price, id)
    }

    fn best(&self) -> Option<OrderId> {
        self.levels
            .iter()
            .next()
            .and_then(|(_, queue)| queue.front().copied())
    }

    fn best_price(&self) -> Option<Price> {
        self.levels.keys().next().copied()
    }

    fn len(&self) -> usize {
        self.levels.values().map(VecDeque::len).sum()
    }

    fn ids(&self) -> Vec<OrderId> {
        self.levels
            .iter()
            .flat_map(|(_, queue)| queue.iter().copied())
            .collect()
    }
}

/// Order book for a single instrument
///
/// Owns every resting order outright; the side containers hold ids in
/// priority order. All mutation goes through `&mut self`, so one book is
/// driven by exactly one logical writer.
pub struct OrderBook {
    /// Instrument symbol
    pub market: String,
    /// Buy side (bids)
    bids: BidSide,
    /// Sell side (asks)
    asks: AskSide,
    /// Resting order state, keyed by id
    orders: HashMap<OrderId, Order>,
    /// Every id ever admitted. Never shrinks.
    admitted: HashSet<OrderId>,
    /// Next admission counter value
    next_sequence: Sequence,
}

impl OrderBook {
    /// Create a new empty order book for the given instrument
    pub fn new(market: impl Into<String>) -> Self {
        Self {
            market: market.into(),
            bids: BidSide::new(),
            asks: AskSide::new(),
            orders: HashMap::new(),
            admitted: HashSet::new(),
            next_sequence: 0,
        }
    }

    /// Admit an order id, rejecting duplicates
    ///
    /// Runs before any book mutation, so a rejected order never appears in
    /// the book or in matching.
    pub fn admit(&mut self, id: OrderId) -> Result<()> {
        if !self.admitted.insert(id) {
            return Err(Error::DuplicateOrderId(id));
        }
        Ok(())
    }

    /// Take the next admission counter value
    pub fn next_sequence(&mut self) -> Sequence {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }

    /// Add an order to the side selected by its direction
    pub fn insert(&mut self, order: Order) -> Result<()> {
        if self.orders.contains_key(&order.id) {
            return Err(Error::InvariantViolation(format!(
                "order {} is already resting in the book",
                order.id
            )));
        }
        debug!(
            "inserting order {} into {} side of {} at price {}",
            order.id,
            match order.side {
                Side::Buy => "bid",
                Side::Sell => "ask",
            },
            self.market,
            order.price
        );
        match order.side {
            Side::Buy => self.bids.enqueue(order.price, order.id),
            Side::Sell => self.asks.enqueue(order.price, order.id),
        }
        self.orders.insert(order.id, order);
        Ok(())
    }

    /// Get a resting order by id
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    /// The highest-priority order on a side, or None when the side is empty
    pub fn peek_best(&self, side: Side) -> Option<&Order> {
        let id = match side {
            Side::Buy => self.bids.best(),
            Side::Sell => self.asks.best(),
        };
        id.and_then(|id| self.orders.get(&id))
    }

    /// Decrement a resting order's remaining quantity by a fill
    ///
    /// Returns the post-fill state of the order. The order stays in its side
    /// container even when it reaches zero; the caller removes it through
    /// [`OrderBook::remove_filled`].
    pub fn apply_fill(&mut self, id: OrderId, quantity: Quantity) -> Result<Order> {
        let order = self.orders.get_mut(&id).ok_or_else(|| {
            Error::InvariantViolation(format!("fill applied to order {} not in the book", id))
        })?;
        if quantity == 0 || quantity > order.remaining_quantity {
            return Err(Error::InvariantViolation(format!(
                "fill of {} exceeds remaining quantity {} of order {}",
                quantity, order.remaining_quantity, id
            )));
        }
        order.remaining_quantity -= quantity;
        order.filled_quantity += quantity;
        order.status = if order.remaining_quantity == 0 {
            Status::Filled
        } else {
            Status::PartiallyFilled
        };
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    /// Remove an order from the book by identity
    ///
    /// Idempotent: an id that is not in the book is a no-op (`Ok(None)`).
    /// An id that is tracked but missing from its side container means the
    /// book is corrupt and is reported as an invariant violation.
    pub fn remove(&mut self, id: OrderId) -> Result<Option<Order>> {
        let Some(order) = self.orders.get(&id) else {
            return Ok(None);
        };
        let dequeued = match order.side {
            Side::Buy => self.bids.dequeue(order.price, id),
            Side::Sell => self.asks.dequeue(order.price, id),
        };
        if !dequeued {
            return Err(Error::InvariantViolation(format!(
                "order {} is tracked but missing from its side container",
                id
            )));
        }
        let order = self.orders.remove(&id);
        debug!("removed order {} from {}", id, self.market);
        Ok(order)
    }

    /// Remove an order that was just filled
    ///
    /// A filled order that is no longer in the book indicates corruption,
    /// so absence is an error here, unlike [`OrderBook::remove`].
    pub fn remove_filled(&mut self, id: OrderId) -> Result<Order> {
        self.remove(id)?.ok_or_else(|| {
            Error::InvariantViolation(format!("filled order {} was already absent from the book", id))
        })
    }

    /// Get the best bid price
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    /// Get the best ask price
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    /// Get the current spread
    pub fn spread(&self) -> Option<Price> {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) => ask.checked_sub(bid),
            _ => None,
        }
    }

    /// Number of resting buy orders
    pub fn bid_count(&self) -> usize {
        self.bids.len()
    }

    /// Number of resting sell orders
    pub fn ask_count(&self) -> usize {
        self.asks.len()
    }

    /// Serializable view of both sides in priority order
    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            buy_orders: self
                .bids
                .ids()
                .into_iter()
                .filter_map(|id| self.orders.get(&id))
                .map(Order::overview)
                .collect(),
            sell_orders: self
                .asks
                .ids()
                .into_iter()
                .filter_map(|id| self.orders.get(&id))
                .map(Order::overview)
                .collect(),
        }
    }
}
