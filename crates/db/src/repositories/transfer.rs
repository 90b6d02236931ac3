//! Transfer repository for inter-fund database operations.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use caja_core::ledger::{LedgerValidationError, validate_transfer};

use crate::entities::{events, sea_orm_active_enums::EventStatus, transfers};

/// Error types for transfer operations.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// Transfer not found.
    #[error("Transfer not found: {0}")]
    NotFound(Uuid),

    /// Event not found.
    #[error("Event not found: {0}")]
    EventNotFound(Uuid),

    /// Event fund is closed to postings.
    #[error("Event {0} is finalized, no postings allowed")]
    EventFinalized(Uuid),

    /// Business rule violation.
    #[error(transparent)]
    Validation(#[from] LedgerValidationError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a transfer.
#[derive(Debug, Clone)]
pub struct CreateTransferInput {
    /// Positive amount, two decimal places.
    pub amount: Decimal,
    /// Transfer date.
    pub transfer_date: NaiveDate,
    /// Description.
    pub description: String,
    /// Source fund; `None` means the General fund.
    pub from_event_id: Option<Uuid>,
    /// Destination fund; `None` means the General fund.
    pub to_event_id: Option<Uuid>,
    /// User who recorded the transfer.
    pub created_by: Uuid,
}

/// Transfer repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct TransferRepository {
    db: DatabaseConnection,
}

impl TransferRepository {
    /// Creates a new transfer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new transfer between two funds.
    ///
    /// Both endpoints must be open; a transfer in or out of a finalized
    /// event fund would change a closed balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not positive, both endpoints
    /// name the same fund, or an endpoint event is missing or finalized.
    pub async fn create(
        &self,
        input: CreateTransferInput,
    ) -> Result<transfers::Model, TransferError> {
        validate_transfer(input.amount, input.from_event_id, input.to_event_id)?;

        self.ensure_fund_open(input.from_event_id).await?;
        self.ensure_fund_open(input.to_event_id).await?;

        let transfer = transfers::ActiveModel {
            id: Set(Uuid::now_v7()),
            amount: Set(input.amount),
            transfer_date: Set(input.transfer_date),
            description: Set(input.description),
            from_event_id: Set(input.from_event_id),
            to_event_id: Set(input.to_event_id),
            created_by: Set(input.created_by),
            created_at: Set(chrono::Utc::now().into()),
        };

        Ok(transfer.insert(&self.db).await?)
    }

    /// Finds a transfer by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<transfers::Model>, DbErr> {
        transfers::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists transfers, newest first, optionally touching one event fund.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, event_id: Option<Uuid>) -> Result<Vec<transfers::Model>, DbErr> {
        let mut query = transfers::Entity::find();

        if let Some(event_id) = event_id {
            query = query.filter(
                transfers::Column::FromEventId
                    .eq(event_id)
                    .or(transfers::Column::ToEventId.eq(event_id)),
            );
        }

        query
            .order_by_desc(transfers::Column::TransferDate)
            .order_by_desc(transfers::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Deletes a transfer.
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer is missing or either endpoint
    /// fund is finalized.
    pub async fn delete(&self, id: Uuid) -> Result<(), TransferError> {
        let transfer = transfers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(TransferError::NotFound(id))?;

        self.ensure_fund_open(transfer.from_event_id).await?;
        self.ensure_fund_open(transfer.to_event_id).await?;

        transfers::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    async fn ensure_fund_open(&self, event_id: Option<Uuid>) -> Result<(), TransferError> {
        let Some(event_id) = event_id else {
            return Ok(());
        };

        let event = events::Entity::find_by_id(event_id)
            .one(&self.db)
            .await?
            .ok_or(TransferError::EventNotFound(event_id))?;

        if event.status == EventStatus::Finalized {
            return Err(TransferError::EventFinalized(event_id));
        }

        Ok(())
    }
}
