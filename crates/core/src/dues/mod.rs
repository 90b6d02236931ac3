//! Per-member dues tracking.
//!
//! Dues are ordinary income transactions attributed to a member in a
//! dues category; this module turns those payments into a per-month
//! settled/outstanding view for a calendar year.

pub mod service;
pub mod types;

pub use service::DuesService;
pub use types::{DuesPayment, MemberDuesStatus, MonthStatus};
