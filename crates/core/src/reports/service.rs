//! Report generation service.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::ledger::{LedgerAggregator, TransactionKind, TransactionRecord, TransferRecord};

use super::types::{CategoryBreakdown, PeriodReport};

/// Service for generating period reports.
pub struct ReportService;

impl ReportService {
    /// Generates a report for an inclusive date range.
    ///
    /// The snapshot is narrowed to the range and fed through the same
    /// aggregator the dashboard uses; there is no separate balance code
    /// path for reports.
    #[must_use]
    pub fn period_report(
        from: NaiveDate,
        to: NaiveDate,
        transactions: &[TransactionRecord],
        transfers: &[TransferRecord],
        known_event_ids: &[Uuid],
    ) -> PeriodReport {
        let in_range: Vec<TransactionRecord> = transactions
            .iter()
            .filter(|t| t.date >= from && t.date <= to)
            .cloned()
            .collect();
        let transfers_in_range: Vec<TransferRecord> = transfers
            .iter()
            .filter(|t| t.date >= from && t.date <= to)
            .cloned()
            .collect();

        let funds =
            LedgerAggregator::aggregate(&in_range, &transfers_in_range, known_event_ids, None);

        let total_income = funds.total_income();
        let total_expense = funds.total_expense();

        let mut by_category: BTreeMap<Uuid, CategoryBreakdown> = BTreeMap::new();
        for tx in &in_range {
            let entry = by_category
                .entry(tx.category_id)
                .or_insert_with(|| CategoryBreakdown {
                    category_id: tx.category_id,
                    income: rust_decimal::Decimal::ZERO,
                    expense: rust_decimal::Decimal::ZERO,
                });
            match tx.kind {
                TransactionKind::Income => entry.income += tx.amount,
                TransactionKind::Expense => entry.expense += tx.amount,
            }
        }

        PeriodReport {
            from,
            to,
            total_income,
            total_expense,
            net: total_income - total_expense,
            categories: by_category.into_values().collect(),
            funds,
        }
    }
}
