//! `SeaORM` Entity for transfers table.
//!
//! Transfers move balance between funds; they are not transactions and
//! carry no category or kind.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transfers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount: Decimal,
    pub transfer_date: Date,
    pub description: String,
    /// `None` means the General fund.
    pub from_event_id: Option<Uuid>,
    /// `None` means the General fund.
    pub to_event_id: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::events::Entity",
        from = "Column::FromEventId",
        to = "super::events::Column::Id"
    )]
    FromEvent,
    #[sea_orm(
        belongs_to = "super::events::Entity",
        from = "Column::ToEventId",
        to = "super::events::Column::Id"
    )]
    ToEvent,
}

impl ActiveModelBehavior for ActiveModel {}
