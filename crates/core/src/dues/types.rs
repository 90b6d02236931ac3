//! Dues tracking domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A dues payment attributed to a member.
///
/// Derived from income transactions in dues categories that carry a
/// member attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuesPayment {
    /// The paying member.
    pub member_id: Uuid,
    /// Payment date.
    pub date: NaiveDate,
    /// Positive amount.
    pub amount: Decimal,
}

/// Settlement status for a single month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthStatus {
    /// Month number (1-12).
    pub month: u32,
    /// Amount paid toward this month.
    pub paid: Decimal,
    /// Whether the monthly due is fully covered.
    pub settled: bool,
}

/// A member's dues status for one calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDuesStatus {
    /// The member.
    pub member_id: Uuid,
    /// The calendar year.
    pub year: i32,
    /// The monthly due amount applied.
    pub monthly_due: Decimal,
    /// Per-month settlement, always 12 entries (January first).
    pub months: Vec<MonthStatus>,
    /// Total paid in the year.
    pub total_paid: Decimal,
    /// Number of months not fully covered.
    pub outstanding_months: u32,
}
