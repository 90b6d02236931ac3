//! Period report generation.
//!
//! Pure business logic for the reports endpoint: filter the snapshot to
//! a date range, run it through the same ledger aggregator the dashboard
//! uses, and attach a per-category breakdown.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::ReportService;
pub use types::{CategoryBreakdown, PeriodReport};
