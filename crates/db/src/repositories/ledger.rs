//! Ledger snapshot loader.
//!
//! Reads every transaction and transfer into the plain records the
//! aggregator consumes. The dashboard and reports both go through this
//! loader so they can never disagree about the underlying facts.

use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QueryOrder};
use uuid::Uuid;

use caja_core::ledger::{TransactionRecord, TransferRecord};

use crate::entities::{events, transactions, transfers};

/// The raw ledger facts for one aggregation run.
#[derive(Debug, Clone)]
pub struct LedgerSnapshot {
    /// All transactions, oldest first.
    pub transactions: Vec<TransactionRecord>,
    /// All transfers, oldest first.
    pub transfers: Vec<TransferRecord>,
    /// IDs of every event (any status); transactions referencing an ID
    /// not in this list land in the orphan bucket.
    pub known_event_ids: Vec<Uuid>,
}

/// Ledger snapshot repository.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads the full ledger snapshot.
    ///
    /// Date filtering happens in the aggregator, not here; the snapshot
    /// is always complete so a single load serves dashboard, reports,
    /// and the conservation check.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the database queries fail.
    pub async fn load_snapshot(&self) -> Result<LedgerSnapshot, DbErr> {
        let transactions = transactions::Entity::find()
            .order_by_asc(transactions::Column::TransactionDate)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|row| TransactionRecord {
                id: row.id,
                kind: row.kind.into(),
                amount: row.amount,
                date: row.transaction_date,
                event_id: row.event_id,
                category_id: row.category_id,
                member_id: row.member_id,
            })
            .collect();

        let transfers = transfers::Entity::find()
            .order_by_asc(transfers::Column::TransferDate)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|row| TransferRecord {
                id: row.id,
                amount: row.amount,
                date: row.transfer_date,
                from_event_id: row.from_event_id,
                to_event_id: row.to_event_id,
            })
            .collect();

        let known_event_ids = events::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|event| event.id)
            .collect();

        Ok(LedgerSnapshot {
            transactions,
            transfers,
            known_event_ids,
        })
    }
}
