//! `SeaORM` entity definitions.

pub mod attendance;
pub mod audit_logs;
pub mod categories;
pub mod events;
pub mod members;
pub mod sea_orm_active_enums;
pub mod sessions;
pub mod settings;
pub mod transactions;
pub mod transfers;
pub mod users;
