//! Member repository for directory database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{attendance, members, transactions};

/// Error types for member operations.
#[derive(Debug, thiserror::Error)]
pub enum MemberError {
    /// Member not found.
    #[error("Member not found: {0}")]
    NotFound(Uuid),

    /// Member still referenced by transactions or attendance.
    #[error("Member {0} is referenced by financial history and cannot be deleted")]
    StillReferenced(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a member.
#[derive(Debug, Clone)]
pub struct CreateMemberInput {
    /// Display name.
    pub full_name: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Birth date.
    pub birth_date: Option<chrono::NaiveDate>,
    /// Date the member joined the group.
    pub joined_at: Option<chrono::NaiveDate>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Input for updating a member. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateMemberInput {
    /// New display name.
    pub full_name: Option<String>,
    /// New contact phone.
    pub phone: Option<Option<String>>,
    /// New contact email.
    pub email: Option<Option<String>>,
    /// New birth date.
    pub birth_date: Option<Option<chrono::NaiveDate>>,
    /// New join date.
    pub joined_at: Option<Option<chrono::NaiveDate>>,
    /// New notes.
    pub notes: Option<Option<String>>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Member repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct MemberRepository {
    db: DatabaseConnection,
}

impl MemberRepository {
    /// Creates a new member repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new member.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: CreateMemberInput) -> Result<members::Model, DbErr> {
        let now = chrono::Utc::now().into();

        members::ActiveModel {
            id: Set(Uuid::now_v7()),
            full_name: Set(input.full_name),
            phone: Set(input.phone),
            email: Set(input.email),
            birth_date: Set(input.birth_date),
            joined_at: Set(input.joined_at),
            notes: Set(input.notes),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// Finds a member by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<members::Model>, DbErr> {
        members::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists members ordered by name.
    ///
    /// `active_only` hides deactivated members.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, active_only: bool) -> Result<Vec<members::Model>, DbErr> {
        let mut query = members::Entity::find();

        if active_only {
            query = query.filter(members::Column::IsActive.eq(true));
        }

        query
            .order_by_asc(members::Column::FullName)
            .all(&self.db)
            .await
    }

    /// Updates a member.
    ///
    /// # Errors
    ///
    /// Returns `MemberError::NotFound` if the member does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateMemberInput,
    ) -> Result<members::Model, MemberError> {
        let member = members::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(MemberError::NotFound(id))?;

        let mut active: members::ActiveModel = member.into();

        if let Some(full_name) = input.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(phone);
        }
        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(birth_date) = input.birth_date {
            active.birth_date = Set(birth_date);
        }
        if let Some(joined_at) = input.joined_at {
            active.joined_at = Set(joined_at);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(notes);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a member.
    ///
    /// Members referenced by transactions or attendance cannot be deleted;
    /// deactivate them instead so history stays intact.
    ///
    /// # Errors
    ///
    /// Returns `MemberError::StillReferenced` if financial history exists.
    pub async fn delete(&self, id: Uuid) -> Result<(), MemberError> {
        let member = members::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(MemberError::NotFound(id))?;

        let transaction_count = transactions::Entity::find()
            .filter(transactions::Column::MemberId.eq(id))
            .count(&self.db)
            .await?;

        let attendance_count = attendance::Entity::find()
            .filter(attendance::Column::MemberId.eq(id))
            .count(&self.db)
            .await?;

        if transaction_count > 0 || attendance_count > 0 {
            return Err(MemberError::StillReferenced(id));
        }

        members::Entity::delete_by_id(member.id)
            .exec(&self.db)
            .await?;

        Ok(())
    }
}
