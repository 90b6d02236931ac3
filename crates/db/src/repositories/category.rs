//! Category repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{categories, sea_orm_active_enums::TransactionKind, transactions};

/// Error types for category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// Category not found.
    #[error("Category not found: {0}")]
    NotFound(Uuid),

    /// Category name already in use.
    #[error("Category name already in use: {0}")]
    NameTaken(String),

    /// Category still referenced by transactions.
    #[error("Category {0} is referenced by transactions and cannot be deleted")]
    StillReferenced(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    /// Unique category name.
    pub name: String,
    /// Income or expense.
    pub kind: TransactionKind,
    /// Whether income in this category counts toward member dues.
    pub is_dues: bool,
}

/// Input for updating a category. `None` fields are left untouched.
///
/// The kind is immutable once set; changing it would silently reclassify
/// existing transactions.
#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryInput {
    /// New name.
    pub name: Option<String>,
    /// New dues flag.
    pub is_dues: Option<bool>,
}

/// Category repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new category.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NameTaken` if the name is already used.
    pub async fn create(
        &self,
        input: CreateCategoryInput,
    ) -> Result<categories::Model, CategoryError> {
        let existing = categories::Entity::find()
            .filter(categories::Column::Name.eq(&input.name))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(CategoryError::NameTaken(input.name));
        }

        let now = chrono::Utc::now().into();
        let category = categories::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name),
            kind: Set(input.kind),
            is_dues: Set(input.is_dues),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(category.insert(&self.db).await?)
    }

    /// Finds a category by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<categories::Model>, DbErr> {
        categories::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists all categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<categories::Model>, DbErr> {
        categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await
    }

    /// Updates a category's name or dues flag.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if the category does not exist,
    /// or `CategoryError::NameTaken` if the new name collides.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateCategoryInput,
    ) -> Result<categories::Model, CategoryError> {
        let category = categories::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CategoryError::NotFound(id))?;

        if let Some(name) = &input.name {
            let collision = categories::Entity::find()
                .filter(categories::Column::Name.eq(name))
                .filter(categories::Column::Id.ne(id))
                .one(&self.db)
                .await?;

            if collision.is_some() {
                return Err(CategoryError::NameTaken(name.clone()));
            }
        }

        let mut active: categories::ActiveModel = category.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(is_dues) = input.is_dues {
            active.is_dues = Set(is_dues);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a category.
    ///
    /// Categories referenced by transactions cannot be deleted.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::StillReferenced` if transactions use it.
    pub async fn delete(&self, id: Uuid) -> Result<(), CategoryError> {
        let category = categories::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CategoryError::NotFound(id))?;

        let usage = transactions::Entity::find()
            .filter(transactions::Column::CategoryId.eq(id))
            .count(&self.db)
            .await?;

        if usage > 0 {
            return Err(CategoryError::StillReferenced(id));
        }

        categories::Entity::delete_by_id(category.id)
            .exec(&self.db)
            .await?;

        Ok(())
    }
}
