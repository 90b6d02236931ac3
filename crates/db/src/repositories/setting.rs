//! Settings repository.
//!
//! Key/value store; rows with a `user_id` are per-user preferences,
//! rows without are global settings (e.g. the monthly dues amount).

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::settings;

/// Settings repository.
#[derive(Debug, Clone)]
pub struct SettingRepository {
    db: DatabaseConnection,
}

impl SettingRepository {
    /// Creates a new settings repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets a setting by key and scope.
    ///
    /// `user_id = None` reads the global scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(
        &self,
        key: &str,
        user_id: Option<Uuid>,
    ) -> Result<Option<settings::Model>, DbErr> {
        let mut query = settings::Entity::find().filter(settings::Column::Key.eq(key));

        query = match user_id {
            Some(uid) => query.filter(settings::Column::UserId.eq(uid)),
            None => query.filter(settings::Column::UserId.is_null()),
        };

        query.one(&self.db).await
    }

    /// Creates or replaces a setting in the given scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub async fn upsert(
        &self,
        key: &str,
        value: serde_json::Value,
        user_id: Option<Uuid>,
    ) -> Result<settings::Model, DbErr> {
        let now = chrono::Utc::now().into();

        if let Some(existing) = self.get(key, user_id).await? {
            let mut active: settings::ActiveModel = existing.into();
            active.value = Set(value);
            active.updated_at = Set(now);
            return active.update(&self.db).await;
        }

        settings::ActiveModel {
            id: Set(Uuid::now_v7()),
            key: Set(key.to_string()),
            value: Set(value),
            user_id: Set(user_id),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// Lists all settings in a scope, ordered by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, user_id: Option<Uuid>) -> Result<Vec<settings::Model>, DbErr> {
        let query = match user_id {
            Some(uid) => settings::Entity::find().filter(settings::Column::UserId.eq(uid)),
            None => settings::Entity::find().filter(settings::Column::UserId.is_null()),
        };

        query.order_by_asc(settings::Column::Key).all(&self.db).await
    }
}
