//! Tests for repository logic that does not need a live database.

use rstest::rstest;
use rust_decimal_macros::dec;
use uuid::Uuid;

use caja_core::ledger::{LedgerValidationError, validate_transfer};

use crate::entities::sea_orm_active_enums::TransactionKind;
use crate::repositories::SessionRepository;

#[test]
fn test_hash_token_is_deterministic() {
    let a = SessionRepository::hash_token("refresh-token-1");
    let b = SessionRepository::hash_token("refresh-token-1");
    assert_eq!(a, b);
}

#[test]
fn test_hash_token_differs_per_token() {
    let a = SessionRepository::hash_token("refresh-token-1");
    let b = SessionRepository::hash_token("refresh-token-2");
    assert_ne!(a, b);
    // SHA-256 hex digest
    assert_eq!(a.len(), 64);
}

#[rstest]
#[case(TransactionKind::Income, caja_core::ledger::TransactionKind::Income)]
#[case(TransactionKind::Expense, caja_core::ledger::TransactionKind::Expense)]
fn test_transaction_kind_round_trips_to_core(
    #[case] entity: TransactionKind,
    #[case] core: caja_core::ledger::TransactionKind,
) {
    let converted: caja_core::ledger::TransactionKind = entity.into();
    assert_eq!(converted, core);
    assert_eq!(TransactionKind::from(core), entity);
}

#[test]
fn test_transfer_endpoints_validated_before_write() {
    // The same rule the repository applies before inserting.
    let event = Uuid::new_v4();
    assert!(validate_transfer(dec!(25.00), None, Some(event)).is_ok());
    assert_eq!(
        validate_transfer(dec!(25.00), Some(event), Some(event)),
        Err(LedgerValidationError::SelfTransfer)
    );
}
