//! Integer units for prices and quantities
//!
//! All monetary values are carried as integers in the smallest unit of the
//! instrument, so arithmetic in the matching core is exact and overflow-free
//! for any realistic book.

/// Order identifier, unique among admitted orders
pub type OrderId = u64;

/// Price in the smallest price unit
pub type Price = u64;

/// Quantity in the smallest quantity unit
pub type Quantity = u64;

/// Monotonic admission counter, used only as a time-priority tie-break
pub type Sequence = u64;
