//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod audit;
pub mod category;
pub mod event;
pub mod ledger;
pub mod member;
pub mod session;
pub mod setting;
pub mod transaction;
pub mod transfer;
pub mod user;

#[cfg(test)]
mod repository_tests;

pub use audit::{AuditEntry, AuditRepository};
pub use category::{CategoryError, CategoryRepository, CreateCategoryInput, UpdateCategoryInput};
pub use event::{CreateEventInput, EventError, EventRepository, UpdateEventInput};
pub use ledger::{LedgerRepository, LedgerSnapshot};
pub use member::{CreateMemberInput, MemberError, MemberRepository, UpdateMemberInput};
pub use session::SessionRepository;
pub use setting::SettingRepository;
pub use transaction::{
    CreateTransactionInput, TransactionError, TransactionFilter, TransactionRepository,
    UpdateTransactionInput,
};
pub use transfer::{CreateTransferInput, TransferError, TransferRepository};
pub use user::{CreateUserInput, UserError, UserRepository};
