//! `SeaORM` active enums mapping Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Application user roles.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
pub enum UserRole {
    /// Full access: settings, users, audit log.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Financial writes: transactions, transfers, events, imports.
    #[sea_orm(string_value = "treasurer")]
    Treasurer,
    /// Read-only access.
    #[sea_orm(string_value = "viewer")]
    Viewer,
}

/// Direction of a transaction (and the kind of the category it uses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_kind")]
pub enum TransactionKind {
    /// Money coming in.
    #[sea_orm(string_value = "income")]
    Income,
    /// Money going out.
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl From<TransactionKind> for caja_core::ledger::TransactionKind {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Income => Self::Income,
            TransactionKind::Expense => Self::Expense,
        }
    }
}

impl From<caja_core::ledger::TransactionKind> for TransactionKind {
    fn from(kind: caja_core::ledger::TransactionKind) -> Self {
        match kind {
            caja_core::ledger::TransactionKind::Income => Self::Income,
            caja_core::ledger::TransactionKind::Expense => Self::Expense,
        }
    }
}

/// Event lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "event_status")]
pub enum EventStatus {
    /// Event accepts new transactions and transfers.
    #[sea_orm(string_value = "active")]
    Active,
    /// Event is closed to new postings; its fund and history remain.
    #[sea_orm(string_value = "finalized")]
    Finalized,
}
