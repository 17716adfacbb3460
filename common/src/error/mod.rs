//! Error types for the exchange
//!
//! This module provides a unified error handling system for all crates in
//! the exchange. Rejections (duplicate ids, validation failures) are
//! recoverable and returned to the caller; invariant violations indicate a
//! corrupt book and abort the operation that detected them.

use thiserror::Error;

use crate::units::OrderId;

/// Exchange error type
#[derive(Debug, Error)]
pub enum Error {
    /// An order id that was already admitted was submitted again
    #[error("duplicate order id: {0}")]
    DuplicateOrderId(OrderId),

    /// Malformed or out-of-range request fields
    #[error("validation error: {0}")]
    ValidationError(String),

    /// The book was found in a state that must be unreachable in correct
    /// operation, e.g. a filled order still resting on a side
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Convert string messages into an error
impl From<String> for Error {
    fn from(message: String) -> Self {
        Error::Internal(message)
    }
}

/// Convert static string references into an error
impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Error::Internal(message.to_string())
    }
}
