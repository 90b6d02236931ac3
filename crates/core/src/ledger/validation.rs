//! Business rule validation for financial writes.
//!
//! These checks run before anything is persisted; the aggregator assumes
//! its inputs already passed them.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::types::TransactionKind;

/// Validation errors for financial writes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerValidationError {
    /// Amount is zero or negative.
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Transfer source and destination are the same fund.
    #[error("transfer source and destination funds must differ")]
    SelfTransfer,

    /// Category kind does not match the transaction kind.
    #[error("category kind {category_kind} does not match transaction kind {transaction_kind}")]
    CategoryKindMismatch {
        /// The category's kind.
        category_kind: TransactionKind,
        /// The transaction's kind.
        transaction_kind: TransactionKind,
    },
}

/// Validates a transaction before it is written.
///
/// # Errors
///
/// Returns an error if the amount is not positive or the category kind
/// does not match the transaction kind.
pub fn validate_transaction(
    kind: TransactionKind,
    amount: Decimal,
    category_kind: TransactionKind,
) -> Result<(), LedgerValidationError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerValidationError::NonPositiveAmount(amount));
    }

    if kind != category_kind {
        return Err(LedgerValidationError::CategoryKindMismatch {
            category_kind,
            transaction_kind: kind,
        });
    }

    Ok(())
}

/// Validates a transfer before it is written.
///
/// A transfer with both endpoints equal (including both General) is
/// meaningless and is rejected rather than silently netted to zero.
///
/// # Errors
///
/// Returns an error if the amount is not positive or both endpoints
/// name the same fund.
pub fn validate_transfer(
    amount: Decimal,
    from_event_id: Option<Uuid>,
    to_event_id: Option<Uuid>,
) -> Result<(), LedgerValidationError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerValidationError::NonPositiveAmount(amount));
    }

    if from_event_id == to_event_id {
        return Err(LedgerValidationError::SelfTransfer);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_valid_transaction() {
        let result = validate_transaction(
            TransactionKind::Income,
            dec!(100.00),
            TransactionKind::Income,
        );
        assert!(result.is_ok());
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-5.00))]
    fn test_transaction_rejects_non_positive_amount(#[case] amount: Decimal) {
        let result =
            validate_transaction(TransactionKind::Expense, amount, TransactionKind::Expense);
        assert_eq!(
            result,
            Err(LedgerValidationError::NonPositiveAmount(amount))
        );
    }

    #[test]
    fn test_transaction_rejects_category_kind_mismatch() {
        let result = validate_transaction(
            TransactionKind::Income,
            dec!(50.00),
            TransactionKind::Expense,
        );
        assert_eq!(
            result,
            Err(LedgerValidationError::CategoryKindMismatch {
                category_kind: TransactionKind::Expense,
                transaction_kind: TransactionKind::Income,
            })
        );
    }

    #[test]
    fn test_valid_transfer() {
        let event = Uuid::new_v4();
        assert!(validate_transfer(dec!(300.00), None, Some(event)).is_ok());
        assert!(validate_transfer(dec!(300.00), Some(event), None).is_ok());
    }

    #[test]
    fn test_transfer_rejects_both_endpoints_general() {
        assert_eq!(
            validate_transfer(dec!(10.00), None, None),
            Err(LedgerValidationError::SelfTransfer)
        );
    }

    #[test]
    fn test_transfer_rejects_same_event_fund() {
        let event = Uuid::new_v4();
        assert_eq!(
            validate_transfer(dec!(10.00), Some(event), Some(event)),
            Err(LedgerValidationError::SelfTransfer)
        );
    }

    #[test]
    fn test_transfer_rejects_non_positive_amount() {
        let event = Uuid::new_v4();
        assert_eq!(
            validate_transfer(dec!(0), None, Some(event)),
            Err(LedgerValidationError::NonPositiveAmount(dec!(0)))
        );
    }
}
