//! Fund and ledger snapshot domain types.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for a fund.
///
/// The General fund ("Caja General") is implicit and always present;
/// every event owns exactly one additional fund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "event_id")]
pub enum FundId {
    /// The implicit general fund.
    General,
    /// The fund owned by an event.
    Event(Uuid),
}

impl FundId {
    /// Maps an optional event reference to a fund (absence means General).
    #[must_use]
    pub fn from_event(event_id: Option<Uuid>) -> Self {
        event_id.map_or(Self::General, Self::Event)
    }

    /// Returns the owning event ID, if this is an event fund.
    #[must_use]
    pub const fn event_id(self) -> Option<Uuid> {
        match self {
            Self::General => None,
            Self::Event(id) => Some(id),
        }
    }
}

impl std::fmt::Display for FundId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::General => write!(f, "general"),
            Self::Event(id) => write!(f, "event:{id}"),
        }
    }
}

/// Direction of a financial fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction kind: {s}")),
        }
    }
}

/// A recorded transaction, as consumed by the aggregator.
///
/// This is a snapshot record already read from storage; amounts are
/// validated (positive, two decimal places) before they reach here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction ID.
    pub id: Uuid,
    /// Income or expense.
    pub kind: TransactionKind,
    /// Positive amount.
    pub amount: Decimal,
    /// Transaction date.
    pub date: NaiveDate,
    /// Owning event fund; `None` means the General fund.
    pub event_id: Option<Uuid>,
    /// Category classification.
    pub category_id: Uuid,
    /// Attributed member, if any.
    pub member_id: Option<Uuid>,
}

impl TransactionRecord {
    /// Returns the fund this transaction belongs to.
    #[must_use]
    pub fn fund(&self) -> FundId {
        FundId::from_event(self.event_id)
    }
}

/// A recorded inter-fund transfer, as consumed by the aggregator.
///
/// Transfers are not transactions: they carry no category or kind and
/// only shift balance between two funds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Transfer ID.
    pub id: Uuid,
    /// Positive amount.
    pub amount: Decimal,
    /// Transfer date.
    pub date: NaiveDate,
    /// Source fund; `None` means the General fund.
    pub from_event_id: Option<Uuid>,
    /// Destination fund; `None` means the General fund.
    pub to_event_id: Option<Uuid>,
}

impl TransferRecord {
    /// Returns the source fund.
    #[must_use]
    pub fn from_fund(&self) -> FundId {
        FundId::from_event(self.from_event_id)
    }

    /// Returns the destination fund.
    #[must_use]
    pub fn to_fund(&self) -> FundId {
        FundId::from_event(self.to_event_id)
    }
}

/// Aggregated activity for a single fund.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundActivity {
    /// Total income recorded against this fund.
    pub income: Decimal,
    /// Total expense recorded against this fund.
    pub expense: Decimal,
    /// Total transferred into this fund.
    pub transfers_in: Decimal,
    /// Total transferred out of this fund.
    pub transfers_out: Decimal,
    /// `income - expense + transfers_in - transfers_out`.
    pub balance: Decimal,
}

impl FundActivity {
    /// Recomputes the balance from the four components.
    pub fn recompute_balance(&mut self) {
        self.balance = self.income - self.expense + self.transfers_in - self.transfers_out;
    }
}

/// The aggregator output: one entry per fund plus the consolidated total.
///
/// Funds with zero activity still report a zero-valued entry so callers
/// can render "no activity" rather than "missing fund". Unknown event
/// references are surfaced in `orphans` instead of raising.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// Activity of the implicit General fund.
    pub general: FundActivity,
    /// Activity per known event fund.
    pub events: BTreeMap<Uuid, FundActivity>,
    /// Activity attributed to event IDs not in the known fund set.
    pub orphans: BTreeMap<Uuid, FundActivity>,
    /// Sum of all fund balances, orphans included.
    pub consolidated_total: Decimal,
}

impl LedgerSummary {
    /// Looks up the activity for a fund, if present.
    #[must_use]
    pub fn fund(&self, fund: FundId) -> Option<&FundActivity> {
        match fund {
            FundId::General => Some(&self.general),
            FundId::Event(id) => self.events.get(&id).or_else(|| self.orphans.get(&id)),
        }
    }

    /// Total income across all funds.
    #[must_use]
    pub fn total_income(&self) -> Decimal {
        self.general.income
            + self.events.values().map(|f| f.income).sum::<Decimal>()
            + self.orphans.values().map(|f| f.income).sum::<Decimal>()
    }

    /// Total expense across all funds.
    #[must_use]
    pub fn total_expense(&self) -> Decimal {
        self.general.expense
            + self.events.values().map(|f| f.expense).sum::<Decimal>()
            + self.orphans.values().map(|f| f.expense).sum::<Decimal>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fund_id_from_event() {
        assert_eq!(FundId::from_event(None), FundId::General);

        let id = Uuid::new_v4();
        assert_eq!(FundId::from_event(Some(id)), FundId::Event(id));
    }

    #[test]
    fn test_fund_id_display() {
        assert_eq!(FundId::General.to_string(), "general");

        let id = Uuid::nil();
        assert_eq!(
            FundId::Event(id).to_string(),
            format!("event:{id}")
        );
    }

    #[test]
    fn test_transaction_kind_from_str() {
        use std::str::FromStr;

        assert_eq!(
            TransactionKind::from_str("income").unwrap(),
            TransactionKind::Income
        );
        assert_eq!(
            TransactionKind::from_str("EXPENSE").unwrap(),
            TransactionKind::Expense
        );
        assert!(TransactionKind::from_str("transfer").is_err());
    }

    #[test]
    fn test_fund_activity_recompute() {
        let mut activity = FundActivity {
            income: dec!(1000),
            expense: dec!(200),
            transfers_in: dec!(50),
            transfers_out: dec!(300),
            balance: Decimal::ZERO,
        };
        activity.recompute_balance();
        assert_eq!(activity.balance, dec!(550));
    }
}
