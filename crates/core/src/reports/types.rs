//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::LedgerSummary;

/// Per-category totals within a report period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    /// The category.
    pub category_id: Uuid,
    /// Total income booked against this category.
    pub income: Decimal,
    /// Total expense booked against this category.
    pub expense: Decimal,
}

/// Financial report for a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodReport {
    /// Period start (inclusive).
    pub from: NaiveDate,
    /// Period end (inclusive).
    pub to: NaiveDate,
    /// Per-fund activity for the period.
    pub funds: LedgerSummary,
    /// Total income in the period.
    pub total_income: Decimal,
    /// Total expense in the period.
    pub total_expense: Decimal,
    /// `total_income - total_expense`.
    pub net: Decimal,
    /// Totals per category, ordered by category ID.
    pub categories: Vec<CategoryBreakdown>,
}
