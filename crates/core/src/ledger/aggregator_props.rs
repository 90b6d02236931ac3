//! Property-based tests for the ledger aggregator.
//!
//! - Property 1: Conservation law (transfers never change the total)
//! - Property 2: Transfer symmetry
//! - Property 3: Idempotence of read
//! - Property 4: Point-in-time consistency
//! - Property 5: Fund isolation

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::aggregator::{LedgerAggregator, check_conservation};
use super::types::{FundId, TransactionKind, TransactionRecord, TransferRecord};

/// Fixed pool of event IDs so generated facts overlap on funds.
fn event_pool() -> Vec<Uuid> {
    (0..4u128).map(Uuid::from_u128).collect()
}

/// Strategy to generate positive decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate dates within March 2026.
fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (1u32..=31u32).prop_map(|day| NaiveDate::from_ymd_opt(2026, 3, day).expect("valid date"))
}

/// Strategy to generate an optional fund reference from the pool.
fn fund_ref_strategy() -> impl Strategy<Value = Option<Uuid>> {
    let pool = event_pool();
    prop_oneof![
        Just(None),
        (0..pool.len()).prop_map(move |i| Some(pool[i])),
    ]
}

fn transaction_strategy() -> impl Strategy<Value = TransactionRecord> {
    (
        positive_amount(),
        date_strategy(),
        fund_ref_strategy(),
        prop::bool::ANY,
    )
        .prop_map(|(amount, date, event_id, is_income)| TransactionRecord {
            id: Uuid::new_v4(),
            kind: if is_income {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            },
            amount,
            date,
            event_id,
            category_id: Uuid::new_v4(),
            member_id: None,
        })
}

fn transfer_strategy() -> impl Strategy<Value = TransferRecord> {
    (positive_amount(), date_strategy(), fund_ref_strategy(), fund_ref_strategy())
        .prop_filter("endpoints must differ", |(_, _, from, to)| from != to)
        .prop_map(|(amount, date, from_event_id, to_event_id)| TransferRecord {
            id: Uuid::new_v4(),
            amount,
            date,
            from_event_id,
            to_event_id,
        })
}

fn snapshot_strategy() -> impl Strategy<Value = (Vec<TransactionRecord>, Vec<TransferRecord>)> {
    (
        prop::collection::vec(transaction_strategy(), 0..40),
        prop::collection::vec(transfer_strategy(), 0..20),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// **Property 1: Conservation law**
    ///
    /// *For any* set of transactions and transfers, the consolidated total
    /// SHALL equal total income minus total expense.
    #[test]
    fn prop_conservation_law((transactions, transfers) in snapshot_strategy()) {
        let summary =
            LedgerAggregator::aggregate(&transactions, &transfers, &event_pool(), None);

        prop_assert!(check_conservation(&summary, &transactions).is_ok());

        let expected: Decimal = transactions
            .iter()
            .map(|t| match t.kind {
                TransactionKind::Income => t.amount,
                TransactionKind::Expense => -t.amount,
            })
            .sum();
        prop_assert_eq!(summary.consolidated_total, expected);
    }

    /// **Property 2: Transfer symmetry**
    ///
    /// *For any* snapshot, appending one transfer of amount A from fund X
    /// to fund Y SHALL change balance(X) by -A, balance(Y) by +A, and no
    /// other fund.
    #[test]
    fn prop_transfer_symmetry(
        (transactions, transfers) in snapshot_strategy(),
        extra in transfer_strategy(),
    ) {
        let pool = event_pool();
        let before = LedgerAggregator::aggregate(&transactions, &transfers, &pool, None);

        let mut transfers_after = transfers;
        transfers_after.push(extra.clone());
        let after = LedgerAggregator::aggregate(&transactions, &transfers_after, &pool, None);

        let from = FundId::from_event(extra.from_event_id);
        let to = FundId::from_event(extra.to_event_id);

        let balance = |summary: &super::types::LedgerSummary, fund: FundId| {
            summary.fund(fund).map_or(Decimal::ZERO, |f| f.balance)
        };

        prop_assert_eq!(balance(&after, from), balance(&before, from) - extra.amount);
        prop_assert_eq!(balance(&after, to), balance(&before, to) + extra.amount);

        for id in &pool {
            let fund = FundId::Event(*id);
            if fund != from && fund != to {
                prop_assert_eq!(balance(&after, fund), balance(&before, fund));
            }
        }
        if from != FundId::General && to != FundId::General {
            prop_assert_eq!(after.general.balance, before.general.balance);
        }

        // The transfer moved money without creating any.
        prop_assert_eq!(after.consolidated_total, before.consolidated_total);
    }

    /// **Property 3: Idempotence of read**
    ///
    /// *For any* input, calling the aggregator twice SHALL yield identical
    /// output (pure function, no hidden state).
    #[test]
    fn prop_aggregation_is_deterministic((transactions, transfers) in snapshot_strategy()) {
        let pool = event_pool();
        let first = LedgerAggregator::aggregate(&transactions, &transfers, &pool, None);
        let second = LedgerAggregator::aggregate(&transactions, &transfers, &pool, None);
        prop_assert_eq!(first, second);
    }

    /// **Property 4: Point-in-time consistency**
    ///
    /// *For any* snapshot aggregated as of date D, adding a transaction
    /// dated after D SHALL not change the result; adding one dated on or
    /// before D SHALL change exactly the fund it targets.
    #[test]
    fn prop_point_in_time_consistency(
        (transactions, transfers) in snapshot_strategy(),
        extra in transaction_strategy(),
    ) {
        let pool = event_pool();
        let cutoff = NaiveDate::from_ymd_opt(2026, 3, 15).expect("valid date");

        let before = LedgerAggregator::aggregate(&transactions, &transfers, &pool, Some(cutoff));

        let mut transactions_after = transactions;
        transactions_after.push(extra.clone());
        let after =
            LedgerAggregator::aggregate(&transactions_after, &transfers, &pool, Some(cutoff));

        if extra.date > cutoff {
            prop_assert_eq!(before, after);
        } else {
            let fund = extra.fund();
            let signed = match extra.kind {
                TransactionKind::Income => extra.amount,
                TransactionKind::Expense => -extra.amount,
            };
            let balance = |summary: &super::types::LedgerSummary, fund: FundId| {
                summary.fund(fund).map_or(Decimal::ZERO, |f| f.balance)
            };
            prop_assert_eq!(balance(&after, fund), balance(&before, fund) + signed);
            prop_assert_eq!(after.consolidated_total, before.consolidated_total + signed);
        }
    }

    /// **Property 5: Fund isolation**
    ///
    /// *For any* snapshot, a transaction against event fund E SHALL never
    /// affect the General fund or any other fund.
    #[test]
    fn prop_fund_isolation(
        (transactions, transfers) in snapshot_strategy(),
        amount in positive_amount(),
        date in date_strategy(),
    ) {
        let pool = event_pool();
        let target = pool[0];

        let before = LedgerAggregator::aggregate(&transactions, &transfers, &pool, None);

        let mut transactions_after = transactions;
        transactions_after.push(TransactionRecord {
            id: Uuid::new_v4(),
            kind: TransactionKind::Income,
            amount,
            date,
            event_id: Some(target),
            category_id: Uuid::new_v4(),
            member_id: None,
        });
        let after = LedgerAggregator::aggregate(&transactions_after, &transfers, &pool, None);

        prop_assert_eq!(after.general.balance, before.general.balance);
        for id in pool.iter().filter(|id| **id != target) {
            prop_assert_eq!(after.events[id].balance, before.events[id].balance);
        }
        prop_assert_eq!(
            after.events[&target].balance,
            before.events[&target].balance + amount
        );
    }
}
