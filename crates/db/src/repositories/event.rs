//! Event repository for database operations.
//!
//! Events own sub-funds in the ledger; deleting an event cascades to its
//! transactions, transfers, and attendance.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{attendance, events, members, sea_orm_active_enums::EventStatus};
use crate::repositories::audit::{AuditEntry, AuditRepository};

/// Error types for event operations.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// Event not found.
    #[error("Event not found: {0}")]
    NotFound(Uuid),

    /// Member not found.
    #[error("Member not found: {0}")]
    MemberNotFound(Uuid),

    /// Event is already finalized.
    #[error("Event {0} is already finalized")]
    AlreadyFinalized(Uuid),

    /// Attendance already recorded for this member.
    #[error("Attendance already recorded for member {member_id} at event {event_id}")]
    AlreadyRecorded {
        /// The event.
        event_id: Uuid,
        /// The member.
        member_id: Uuid,
    },

    /// End date before start date.
    #[error("Event end date must not precede its start date")]
    InvalidDates,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an event.
#[derive(Debug, Clone)]
pub struct CreateEventInput {
    /// Event name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// First day of the event.
    pub starts_on: chrono::NaiveDate,
    /// Last day of the event, if known.
    pub ends_on: Option<chrono::NaiveDate>,
}

/// Input for updating an event. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateEventInput {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New start date.
    pub starts_on: Option<chrono::NaiveDate>,
    /// New end date.
    pub ends_on: Option<Option<chrono::NaiveDate>>,
}

/// Event repository for CRUD and attendance operations.
#[derive(Debug, Clone)]
pub struct EventRepository {
    db: DatabaseConnection,
}

impl EventRepository {
    /// Creates a new event repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new event with an active status.
    ///
    /// # Errors
    ///
    /// Returns `EventError::InvalidDates` if `ends_on` precedes `starts_on`.
    pub async fn create(&self, input: CreateEventInput) -> Result<events::Model, EventError> {
        if let Some(ends_on) = input.ends_on
            && ends_on < input.starts_on
        {
            return Err(EventError::InvalidDates);
        }

        let now = chrono::Utc::now().into();
        let event = events::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name),
            description: Set(input.description),
            starts_on: Set(input.starts_on),
            ends_on: Set(input.ends_on),
            status: Set(EventStatus::Active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(event.insert(&self.db).await?)
    }

    /// Finds an event by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<events::Model>, DbErr> {
        events::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists events, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, status: Option<EventStatus>) -> Result<Vec<events::Model>, DbErr> {
        let mut query = events::Entity::find();

        if let Some(status) = status {
            query = query.filter(events::Column::Status.eq(status));
        }

        query
            .order_by_desc(events::Column::StartsOn)
            .all(&self.db)
            .await
    }

    /// Updates an event's descriptive fields.
    ///
    /// Finalized events stay editable; only postings are frozen.
    ///
    /// # Errors
    ///
    /// Returns `EventError::NotFound` if the event does not exist, or
    /// `EventError::InvalidDates` if the resulting dates are inverted.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateEventInput,
    ) -> Result<events::Model, EventError> {
        let event = events::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(EventError::NotFound(id))?;

        let starts_on = input.starts_on.unwrap_or(event.starts_on);
        let ends_on = input.ends_on.unwrap_or(event.ends_on);
        if let Some(ends_on) = ends_on
            && ends_on < starts_on
        {
            return Err(EventError::InvalidDates);
        }

        let mut active: events::ActiveModel = event.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(new_starts) = input.starts_on {
            active.starts_on = Set(new_starts);
        }
        if let Some(new_ends) = input.ends_on {
            active.ends_on = Set(new_ends);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Finalizes an event, closing its fund to new postings.
    ///
    /// The fund's balance and history remain visible in the ledger.
    ///
    /// # Errors
    ///
    /// Returns `EventError::AlreadyFinalized` if the event is finalized.
    pub async fn finalize(&self, id: Uuid) -> Result<events::Model, EventError> {
        let event = events::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(EventError::NotFound(id))?;

        if event.status == EventStatus::Finalized {
            return Err(EventError::AlreadyFinalized(id));
        }

        let mut active: events::ActiveModel = event.into();
        active.status = Set(EventStatus::Finalized);
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an event and everything attached to it.
    ///
    /// The FK cascades remove the event's transactions, transfers, and
    /// attendance. The audit row commits in the same database transaction
    /// so a partial delete can never go unrecorded.
    ///
    /// # Errors
    ///
    /// Returns `EventError::NotFound` if the event does not exist.
    pub async fn delete(&self, id: Uuid, deleted_by: Uuid) -> Result<(), EventError> {
        let event = events::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(EventError::NotFound(id))?;

        let txn = self.db.begin().await?;

        events::Entity::delete_by_id(id).exec(&txn).await?;

        AuditRepository::record_in(
            &txn,
            AuditEntry {
                action: "event.delete".to_string(),
                entity_type: "event".to_string(),
                entity_id: Some(id),
                detail: Some(serde_json::json!({ "name": event.name })),
                user_id: deleted_by,
            },
        )
        .await?;

        txn.commit().await?;
        Ok(())
    }

    /// Records a member's attendance at an event.
    ///
    /// # Errors
    ///
    /// Returns `EventError::AlreadyRecorded` if the member is already on
    /// the attendance list.
    pub async fn record_attendance(
        &self,
        event_id: Uuid,
        member_id: Uuid,
    ) -> Result<attendance::Model, EventError> {
        events::Entity::find_by_id(event_id)
            .one(&self.db)
            .await?
            .ok_or(EventError::NotFound(event_id))?;

        members::Entity::find_by_id(member_id)
            .one(&self.db)
            .await?
            .ok_or(EventError::MemberNotFound(member_id))?;

        let existing = attendance::Entity::find()
            .filter(attendance::Column::EventId.eq(event_id))
            .filter(attendance::Column::MemberId.eq(member_id))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(EventError::AlreadyRecorded {
                event_id,
                member_id,
            });
        }

        let record = attendance::ActiveModel {
            id: Set(Uuid::now_v7()),
            event_id: Set(event_id),
            member_id: Set(member_id),
            recorded_at: Set(chrono::Utc::now().into()),
        };

        Ok(record.insert(&self.db).await?)
    }

    /// Lists attendance for an event.
    ///
    /// # Errors
    ///
    /// Returns `EventError::NotFound` if the event does not exist.
    pub async fn list_attendance(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<attendance::Model>, EventError> {
        events::Entity::find_by_id(event_id)
            .one(&self.db)
            .await?
            .ok_or(EventError::NotFound(event_id))?;

        let records = attendance::Entity::find()
            .filter(attendance::Column::EventId.eq(event_id))
            .order_by_asc(attendance::Column::RecordedAt)
            .all(&self.db)
            .await?;

        Ok(records)
    }

    /// Removes a member from an event's attendance list.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn remove_attendance(
        &self,
        event_id: Uuid,
        member_id: Uuid,
    ) -> Result<(), DbErr> {
        attendance::Entity::delete_many()
            .filter(attendance::Column::EventId.eq(event_id))
            .filter(attendance::Column::MemberId.eq(member_id))
            .exec(&self.db)
            .await?;

        Ok(())
    }
}
