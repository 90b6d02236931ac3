//! Error types for ledger operations.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors for ledger aggregation and consistency checks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// The consolidated total does not match income minus expense.
    ///
    /// A transfer debited without crediting (or vice versa) — money has
    /// been created or destroyed. This is a fatal internal-consistency
    /// failure and must be logged loudly by the caller.
    #[error(
        "conservation violation: consolidated total {consolidated_total} != income - expense ({expected})"
    )]
    ConservationViolation {
        /// The consolidated total the aggregator produced.
        consolidated_total: Decimal,
        /// The expected value: total income minus total expense.
        expected: Decimal,
    },
}
