//! Audit log repository.
//!
//! Every financial mutation records one audit row; the log is append-only.

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::audit_logs;

/// Input for a single audit row.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    /// Action name, e.g. `transaction.create`.
    pub action: String,
    /// Entity type, e.g. `transaction`.
    pub entity_type: String,
    /// Affected entity, if any.
    pub entity_id: Option<Uuid>,
    /// Free-form JSON detail.
    pub detail: Option<serde_json::Value>,
    /// Acting user.
    pub user_id: Uuid,
}

/// Audit log repository.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    db: DatabaseConnection,
}

impl AuditRepository {
    /// Creates a new audit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an audit entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn record(&self, entry: AuditEntry) -> Result<audit_logs::Model, DbErr> {
        Self::active_model(entry).insert(&self.db).await
    }

    /// Records an audit entry inside an open database transaction.
    ///
    /// Used when the audit row must commit atomically with the mutation
    /// it describes.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn record_in(
        txn: &DatabaseTransaction,
        entry: AuditEntry,
    ) -> Result<audit_logs::Model, DbErr> {
        Self::active_model(entry).insert(txn).await
    }

    fn active_model(entry: AuditEntry) -> audit_logs::ActiveModel {
        audit_logs::ActiveModel {
            id: Set(Uuid::now_v7()),
            action: Set(entry.action),
            entity_type: Set(entry.entity_type),
            entity_id: Set(entry.entity_id),
            detail: Set(entry.detail),
            user_id: Set(entry.user_id),
            created_at: Set(chrono::Utc::now().into()),
        }
    }

    /// Lists audit entries, newest first, with pagination.
    ///
    /// Returns the page of entries and the total row count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<audit_logs::Model>, u64), DbErr> {
        let paginator = audit_logs::Entity::find()
            .order_by_desc(audit_logs::Column::CreatedAt)
            .paginate(&self.db, per_page.max(1));

        let total = paginator.num_items().await?;
        let entries = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((entries, total))
    }
}
