//! Dues status computation.

use chrono::Datelike;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::types::{DuesPayment, MemberDuesStatus, MonthStatus};

/// Computes per-member dues status from attributed payments.
pub struct DuesService;

impl DuesService {
    /// Builds a member's dues status for one calendar year.
    ///
    /// Payments are credited to the month they were made in; a month is
    /// settled once its payments reach the monthly due. Payments from
    /// other members or other years are ignored.
    #[must_use]
    pub fn member_status(
        member_id: Uuid,
        year: i32,
        monthly_due: Decimal,
        payments: &[DuesPayment],
    ) -> MemberDuesStatus {
        let mut paid_by_month = [Decimal::ZERO; 12];

        for payment in payments
            .iter()
            .filter(|p| p.member_id == member_id && p.date.year() == year)
        {
            let index = (payment.date.month0()) as usize;
            paid_by_month[index] += payment.amount;
        }

        let months: Vec<MonthStatus> = (1..=12u32)
            .zip(paid_by_month.iter())
            .map(|(month, paid)| MonthStatus {
                month,
                paid: *paid,
                settled: *paid >= monthly_due,
            })
            .collect();

        let total_paid: Decimal = paid_by_month.iter().copied().sum();
        let outstanding_months =
            u32::try_from(months.iter().filter(|m| !m.settled).count()).unwrap_or(12);

        MemberDuesStatus {
            member_id,
            year,
            monthly_due,
            months,
            total_paid,
            outstanding_months,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn payment(member_id: Uuid, year: i32, month: u32, amount: Decimal) -> DuesPayment {
        DuesPayment {
            member_id,
            date: NaiveDate::from_ymd_opt(year, month, 5).unwrap(),
            amount,
        }
    }

    #[test]
    fn test_no_payments_all_months_outstanding() {
        let member = Uuid::new_v4();
        let status = DuesService::member_status(member, 2026, dec!(10.00), &[]);

        assert_eq!(status.months.len(), 12);
        assert_eq!(status.outstanding_months, 12);
        assert_eq!(status.total_paid, Decimal::ZERO);
    }

    #[test]
    fn test_exact_payment_settles_month() {
        let member = Uuid::new_v4();
        let payments = vec![payment(member, 2026, 3, dec!(10.00))];

        let status = DuesService::member_status(member, 2026, dec!(10.00), &payments);

        assert!(status.months[2].settled);
        assert_eq!(status.months[2].paid, dec!(10.00));
        assert_eq!(status.outstanding_months, 11);
    }

    #[test]
    fn test_partial_payment_does_not_settle() {
        let member = Uuid::new_v4();
        let payments = vec![payment(member, 2026, 1, dec!(4.00))];

        let status = DuesService::member_status(member, 2026, dec!(10.00), &payments);

        assert!(!status.months[0].settled);
        assert_eq!(status.months[0].paid, dec!(4.00));
    }

    #[test]
    fn test_multiple_payments_accumulate_within_month() {
        let member = Uuid::new_v4();
        let payments = vec![
            payment(member, 2026, 6, dec!(6.00)),
            payment(member, 2026, 6, dec!(5.00)),
        ];

        let status = DuesService::member_status(member, 2026, dec!(10.00), &payments);

        assert!(status.months[5].settled);
        assert_eq!(status.months[5].paid, dec!(11.00));
        assert_eq!(status.total_paid, dec!(11.00));
    }

    #[test]
    fn test_other_members_and_years_are_ignored() {
        let member = Uuid::new_v4();
        let other = Uuid::new_v4();
        let payments = vec![
            payment(other, 2026, 2, dec!(10.00)),
            payment(member, 2025, 2, dec!(10.00)),
        ];

        let status = DuesService::member_status(member, 2026, dec!(10.00), &payments);

        assert_eq!(status.total_paid, Decimal::ZERO);
        assert_eq!(status.outstanding_months, 12);
    }
}
