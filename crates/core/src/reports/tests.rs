//! Tests for period report generation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::ledger::{TransactionKind, TransactionRecord, TransferRecord};

use super::service::ReportService;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, day).unwrap()
}

fn tx(
    kind: TransactionKind,
    amount: Decimal,
    day: u32,
    event_id: Option<Uuid>,
    category_id: Uuid,
) -> TransactionRecord {
    TransactionRecord {
        id: Uuid::new_v4(),
        kind,
        amount,
        date: date(day),
        event_id,
        category_id,
        member_id: None,
    }
}

#[test]
fn test_report_covers_only_the_range() {
    let offerings = Uuid::new_v4();
    let transactions = vec![
        tx(TransactionKind::Income, dec!(100), 5, None, offerings),
        tx(TransactionKind::Income, dec!(999), 25, None, offerings),
    ];

    let report = ReportService::period_report(date(1), date(10), &transactions, &[], &[]);

    assert_eq!(report.total_income, dec!(100));
    assert_eq!(report.total_expense, Decimal::ZERO);
    assert_eq!(report.net, dec!(100));
    assert_eq!(report.funds.general.income, dec!(100));
}

#[test]
fn test_report_category_breakdown() {
    let offerings = Uuid::new_v4();
    let supplies = Uuid::new_v4();
    let transactions = vec![
        tx(TransactionKind::Income, dec!(250), 3, None, offerings),
        tx(TransactionKind::Income, dec!(50), 7, None, offerings),
        tx(TransactionKind::Expense, dec!(80), 8, None, supplies),
    ];

    let report = ReportService::period_report(date(1), date(30), &transactions, &[], &[]);

    assert_eq!(report.categories.len(), 2);
    let offering_row = report
        .categories
        .iter()
        .find(|c| c.category_id == offerings)
        .unwrap();
    assert_eq!(offering_row.income, dec!(300));
    assert_eq!(offering_row.expense, Decimal::ZERO);

    let supplies_row = report
        .categories
        .iter()
        .find(|c| c.category_id == supplies)
        .unwrap();
    assert_eq!(supplies_row.expense, dec!(80));
}

#[test]
fn test_report_transfers_move_but_do_not_change_net() {
    let retreat = Uuid::new_v4();
    let offerings = Uuid::new_v4();
    let transactions = vec![tx(TransactionKind::Income, dec!(500), 2, None, offerings)];
    let transfers = vec![TransferRecord {
        id: Uuid::new_v4(),
        amount: dec!(200),
        date: date(4),
        from_event_id: None,
        to_event_id: Some(retreat),
    }];

    let report =
        ReportService::period_report(date(1), date(30), &transactions, &transfers, &[retreat]);

    assert_eq!(report.funds.general.balance, dec!(300));
    assert_eq!(report.funds.events[&retreat].balance, dec!(200));
    assert_eq!(report.net, dec!(500));
    assert_eq!(report.funds.consolidated_total, dec!(500));
}

#[test]
fn test_report_range_boundaries_are_inclusive() {
    let offerings = Uuid::new_v4();
    let transactions = vec![
        tx(TransactionKind::Income, dec!(10), 1, None, offerings),
        tx(TransactionKind::Income, dec!(20), 10, None, offerings),
    ];

    let report = ReportService::period_report(date(1), date(10), &transactions, &[], &[]);
    assert_eq!(report.total_income, dec!(30));
}
