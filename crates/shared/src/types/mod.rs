//! Common types used across the application.

pub mod id;
pub mod money;
pub mod pagination;

pub use id::*;
pub use money::{normalize_amount, parse_amount, AmountError, CURRENCY_SCALE};
pub use pagination::{PageRequest, PageResponse};
