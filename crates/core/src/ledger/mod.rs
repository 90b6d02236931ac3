//! Multi-fund ledger logic.
//!
//! This module implements the core ledger functionality:
//! - Fund identifiers (the implicit General fund plus per-event funds)
//! - Transaction and transfer snapshot records
//! - The balance aggregator (single source of truth for all balances)
//! - The conservation check (transfers never create or destroy money)
//! - Business rule validation for financial writes

pub mod aggregator;
pub mod error;
pub mod types;
pub mod validation;

#[cfg(test)]
mod aggregator_props;

pub use aggregator::{LedgerAggregator, check_conservation};
pub use error::LedgerError;
pub use types::{
    FundActivity, FundId, LedgerSummary, TransactionKind, TransactionRecord, TransferRecord,
};
pub use validation::{LedgerValidationError, validate_transaction, validate_transfer};
