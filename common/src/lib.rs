//! Common types and utilities for the exchange
//!
//! This library contains the shared domain model used across the exchange
//! crates: integer price/quantity units, the order and trade models, the
//! serializable book view, and a unified approach to error handling.

pub mod error;
pub mod model;
pub mod units;

/// Re-export important types
pub use error::{Error, Result};
pub use units::*;

// Re-export utoipa for use in model ToSchema derives
#[cfg(feature = "utoipa")]
pub use utoipa;
