pub mod engine;
pub mod order_book;

pub use engine::{MatchingEngine, MatchingResult, TradePricing};
pub use order_book::{OrderBook, OrderBookSide};
