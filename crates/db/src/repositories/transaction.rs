//! Transaction repository for ledger database operations.
//!
//! All writes run the core validation rules before touching the database,
//! so invalid amounts or mismatched categories never persist.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use caja_core::dues::DuesPayment;
use caja_core::ledger::{LedgerValidationError, validate_transaction};

use crate::entities::{
    categories, events, members,
    sea_orm_active_enums::{EventStatus, TransactionKind},
    transactions,
};
use crate::repositories::audit::{AuditEntry, AuditRepository};

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),

    /// Category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    /// Event not found.
    #[error("Event not found: {0}")]
    EventNotFound(Uuid),

    /// Event fund is closed to postings.
    #[error("Event {0} is finalized, no postings allowed")]
    EventFinalized(Uuid),

    /// Member not found.
    #[error("Member not found: {0}")]
    MemberNotFound(Uuid),

    /// Business rule violation.
    #[error(transparent)]
    Validation(#[from] LedgerValidationError),

    /// Batch import rejected; nothing was written.
    #[error("Import rejected at row {row}: {source}")]
    ImportRow {
        /// Zero-based row index.
        row: usize,
        /// The underlying rejection.
        #[source]
        source: Box<TransactionError>,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Income or expense.
    pub kind: TransactionKind,
    /// Positive amount, two decimal places.
    pub amount: Decimal,
    /// Transaction date.
    pub transaction_date: NaiveDate,
    /// Description.
    pub description: String,
    /// Category classification.
    pub category_id: Uuid,
    /// Owning event fund; `None` posts to the General fund.
    pub event_id: Option<Uuid>,
    /// Attributed member, if any.
    pub member_id: Option<Uuid>,
    /// User who recorded the transaction.
    pub created_by: Uuid,
}

/// Input for updating a transaction. `None` fields are left untouched.
///
/// The kind and owning fund are immutable; delete and re-create to move
/// a transaction between funds.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    /// New amount.
    pub amount: Option<Decimal>,
    /// New date.
    pub transaction_date: Option<NaiveDate>,
    /// New description.
    pub description: Option<String>,
    /// New category (must match the transaction's kind).
    pub category_id: Option<Uuid>,
    /// New member attribution.
    pub member_id: Option<Option<Uuid>>,
}

/// Filter options for listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by kind.
    pub kind: Option<TransactionKind>,
    /// Filter by category.
    pub category_id: Option<Uuid>,
    /// Filter by event fund.
    pub event_id: Option<Uuid>,
    /// Only transactions in the General fund.
    pub general_only: bool,
    /// Filter by attributed member.
    pub member_id: Option<Uuid>,
    /// Filter by date range start (inclusive).
    pub date_from: Option<NaiveDate>,
    /// Filter by date range end (inclusive).
    pub date_to: Option<NaiveDate>,
}

/// Transaction repository for CRUD and import operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is not positive
    /// - The category does not exist or its kind mismatches
    /// - The event does not exist or is finalized
    /// - The member does not exist
    pub async fn create(
        &self,
        input: CreateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        self.validate_input(&input).await?;

        let txn = self.db.begin().await?;
        let model = Self::insert_one(&txn, &input).await?;
        txn.commit().await?;

        Ok(model)
    }

    /// Imports a batch of transactions atomically.
    ///
    /// Every row is validated first; if any row is rejected, nothing is
    /// written. One audit entry covers the whole batch.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::ImportRow` naming the first rejected row.
    pub async fn import_batch(
        &self,
        inputs: Vec<CreateTransactionInput>,
        imported_by: Uuid,
    ) -> Result<Vec<transactions::Model>, TransactionError> {
        for (row, input) in inputs.iter().enumerate() {
            self.validate_input(input)
                .await
                .map_err(|source| TransactionError::ImportRow {
                    row,
                    source: Box::new(source),
                })?;
        }

        let txn = self.db.begin().await?;

        let mut imported = Vec::with_capacity(inputs.len());
        for input in &inputs {
            imported.push(Self::insert_one(&txn, input).await?);
        }

        AuditRepository::record_in(
            &txn,
            AuditEntry {
                action: "transaction.import".to_string(),
                entity_type: "transaction".to_string(),
                entity_id: None,
                detail: Some(serde_json::json!({ "rows": imported.len() })),
                user_id: imported_by,
            },
        )
        .await?;

        txn.commit().await?;
        Ok(imported)
    }

    /// Finds a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<transactions::Model>, DbErr> {
        transactions::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists transactions with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: TransactionFilter,
    ) -> Result<Vec<transactions::Model>, DbErr> {
        let mut query = transactions::Entity::find();

        if let Some(kind) = filter.kind {
            query = query.filter(transactions::Column::Kind.eq(kind));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(transactions::Column::CategoryId.eq(category_id));
        }
        if filter.general_only {
            query = query.filter(transactions::Column::EventId.is_null());
        } else if let Some(event_id) = filter.event_id {
            query = query.filter(transactions::Column::EventId.eq(event_id));
        }
        if let Some(member_id) = filter.member_id {
            query = query.filter(transactions::Column::MemberId.eq(member_id));
        }
        if let Some(date_from) = filter.date_from {
            query = query.filter(transactions::Column::TransactionDate.gte(date_from));
        }
        if let Some(date_to) = filter.date_to {
            query = query.filter(transactions::Column::TransactionDate.lte(date_to));
        }

        query
            .order_by_desc(transactions::Column::TransactionDate)
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Updates a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is missing, its fund is
    /// finalized, or the new values fail validation.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        let transaction = transactions::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(TransactionError::NotFound(id))?;

        self.ensure_fund_open(transaction.event_id).await?;

        let amount = input.amount.unwrap_or(transaction.amount);
        let category_id = input.category_id.unwrap_or(transaction.category_id);
        let category = self.find_category(category_id).await?;

        validate_transaction(transaction.kind.into(), amount, category.kind.into())?;

        if let Some(Some(member_id)) = input.member_id {
            self.ensure_member_exists(member_id).await?;
        }

        let mut active: transactions::ActiveModel = transaction.into();

        if let Some(amount) = input.amount {
            active.amount = Set(amount);
        }
        if let Some(date) = input.transaction_date {
            active.transaction_date = Set(date);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(category_id) = input.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(member_id) = input.member_id {
            active.member_id = Set(member_id);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is missing or its fund is
    /// finalized.
    pub async fn delete(&self, id: Uuid) -> Result<(), TransactionError> {
        let transaction = transactions::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(TransactionError::NotFound(id))?;

        self.ensure_fund_open(transaction.event_id).await?;

        transactions::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    /// Loads a member's dues payments for a calendar year.
    ///
    /// A dues payment is an income transaction attributed to the member
    /// whose category is flagged `is_dues`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn dues_payments(
        &self,
        member_id: Uuid,
        year: i32,
    ) -> Result<Vec<DuesPayment>, DbErr> {
        let dues_category_ids: Vec<Uuid> = categories::Entity::find()
            .filter(categories::Column::IsDues.eq(true))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|category| category.id)
            .collect();

        if dues_category_ids.is_empty() {
            return Ok(Vec::new());
        }

        let year_start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or_default();
        let year_end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or_default();

        let rows = transactions::Entity::find()
            .filter(transactions::Column::MemberId.eq(member_id))
            .filter(transactions::Column::Kind.eq(TransactionKind::Income))
            .filter(transactions::Column::CategoryId.is_in(dues_category_ids))
            .filter(transactions::Column::TransactionDate.gte(year_start))
            .filter(transactions::Column::TransactionDate.lte(year_end))
            .order_by_asc(transactions::Column::TransactionDate)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| DuesPayment {
                member_id,
                date: row.transaction_date,
                amount: row.amount,
            })
            .collect())
    }

    // ------------------------------------------------------------------
    // Validation helpers
    // ------------------------------------------------------------------

    async fn validate_input(
        &self,
        input: &CreateTransactionInput,
    ) -> Result<(), TransactionError> {
        let category = self.find_category(input.category_id).await?;
        validate_transaction(input.kind.into(), input.amount, category.kind.into())?;

        self.ensure_fund_open(input.event_id).await?;

        if let Some(member_id) = input.member_id {
            self.ensure_member_exists(member_id).await?;
        }

        Ok(())
    }

    async fn find_category(&self, id: Uuid) -> Result<categories::Model, TransactionError> {
        categories::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(TransactionError::CategoryNotFound(id))
    }

    /// Checks that the target fund accepts postings.
    ///
    /// The General fund (`None`) is always open; event funds must exist
    /// and not be finalized.
    async fn ensure_fund_open(&self, event_id: Option<Uuid>) -> Result<(), TransactionError> {
        let Some(event_id) = event_id else {
            return Ok(());
        };

        let event = events::Entity::find_by_id(event_id)
            .one(&self.db)
            .await?
            .ok_or(TransactionError::EventNotFound(event_id))?;

        if event.status == EventStatus::Finalized {
            return Err(TransactionError::EventFinalized(event_id));
        }

        Ok(())
    }

    async fn ensure_member_exists(&self, member_id: Uuid) -> Result<(), TransactionError> {
        members::Entity::find_by_id(member_id)
            .one(&self.db)
            .await?
            .ok_or(TransactionError::MemberNotFound(member_id))?;

        Ok(())
    }

    async fn insert_one(
        txn: &DatabaseTransaction,
        input: &CreateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        let now = chrono::Utc::now().into();

        let model = transactions::ActiveModel {
            id: Set(Uuid::now_v7()),
            kind: Set(input.kind),
            amount: Set(input.amount),
            transaction_date: Set(input.transaction_date),
            description: Set(input.description.clone()),
            category_id: Set(input.category_id),
            event_id: Set(input.event_id),
            member_id: Set(input.member_id),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(txn)
        .await?;

        Ok(model)
    }
}
