//! Repository integration tests against a real Postgres database.
//!
//! These are skipped unless `CAJA_TEST_DATABASE_URL` points at a disposable
//! database; `Migrator::fresh` wipes it at the start of the run.

use chrono::NaiveDate;
use futures::future::join_all;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;

use caja_core::ledger::{LedgerAggregator, check_conservation};
use caja_db::entities::sea_orm_active_enums::{TransactionKind, UserRole};
use caja_db::migration::Migrator;
use caja_db::repositories::event::CreateEventInput;
use caja_db::repositories::transaction::{CreateTransactionInput, TransactionError};
use caja_db::repositories::transfer::CreateTransferInput;
use caja_db::repositories::user::CreateUserInput;
use caja_db::{
    CategoryRepository, EventRepository, LedgerRepository, TransactionRepository,
    TransferRepository, UserRepository,
};

async fn test_db() -> Option<DatabaseConnection> {
    let url = std::env::var("CAJA_TEST_DATABASE_URL").ok()?;
    let db = caja_db::connect(&url)
        .await
        .expect("test database connection");
    Migrator::fresh(&db).await.expect("fresh migration");
    Some(db)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// One flow per run; the fresh migration makes parallel tests fight over
// the same schema, so everything lives in a single test function.
#[tokio::test]
async fn ledger_flow_against_postgres() {
    let Some(db) = test_db().await else {
        eprintln!("CAJA_TEST_DATABASE_URL not set, skipping");
        return;
    };

    let users = UserRepository::new(db.clone());
    let treasurer = users
        .create(CreateUserInput {
            email: "treasurer@example.com".into(),
            password_hash: "not-a-real-hash".into(),
            full_name: "Test Treasurer".into(),
            role: UserRole::Treasurer,
        })
        .await
        .unwrap();

    let duplicate = users
        .create(CreateUserInput {
            email: "treasurer@example.com".into(),
            password_hash: "not-a-real-hash".into(),
            full_name: "Duplicate".into(),
            role: UserRole::Viewer,
        })
        .await;
    assert!(duplicate.is_err(), "duplicate email must be rejected");

    // The migration seeds the default categories.
    let categories = CategoryRepository::new(db.clone());
    let seeded = categories.list().await.unwrap();
    let income = seeded
        .iter()
        .find(|c| c.kind == TransactionKind::Income)
        .unwrap()
        .id;
    let expense = seeded
        .iter()
        .find(|c| c.kind == TransactionKind::Expense)
        .unwrap()
        .id;

    let events = EventRepository::new(db.clone());
    let retreat = events
        .create(CreateEventInput {
            name: "Retiro".into(),
            description: None,
            starts_on: date(2026, 7, 10),
            ends_on: Some(date(2026, 7, 13)),
        })
        .await
        .unwrap();

    let tx_repo = TransactionRepository::new(db.clone());

    // An expense posted against an income category never persists.
    let mismatch = tx_repo
        .create(CreateTransactionInput {
            kind: TransactionKind::Expense,
            amount: dec!(10.00),
            transaction_date: date(2026, 6, 1),
            description: "Mismatch".into(),
            category_id: income,
            event_id: None,
            member_id: None,
            created_by: treasurer.id,
        })
        .await;
    assert!(matches!(mismatch, Err(TransactionError::Validation(_))));

    let rows = vec![
        (TransactionKind::Income, dec!(1000.00), income, None),
        (TransactionKind::Expense, dec!(200.00), expense, None),
        (TransactionKind::Expense, dec!(300.00), expense, None),
        (TransactionKind::Income, dec!(500.00), income, Some(retreat.id)),
    ];
    let results = join_all(rows.into_iter().map(|(kind, amount, category_id, event_id)| {
        let repo = tx_repo.clone();
        let created_by = treasurer.id;
        async move {
            repo.create(CreateTransactionInput {
                kind,
                amount,
                transaction_date: date(2026, 6, 15),
                description: "Flow".into(),
                category_id,
                event_id,
                member_id: None,
                created_by,
            })
            .await
        }
    }))
    .await;
    for result in results {
        result.unwrap();
    }

    let transfers = TransferRepository::new(db.clone());
    transfers
        .create(CreateTransferInput {
            amount: dec!(300.00),
            transfer_date: date(2026, 6, 20),
            description: "Seed the retreat".into(),
            from_event_id: None,
            to_event_id: Some(retreat.id),
            created_by: treasurer.id,
        })
        .await
        .unwrap();

    let snapshot = LedgerRepository::new(db.clone())
        .load_snapshot()
        .await
        .unwrap();
    let summary = LedgerAggregator::aggregate(
        &snapshot.transactions,
        &snapshot.transfers,
        &snapshot.known_event_ids,
        None,
    );

    assert_eq!(summary.general.balance, dec!(200.00));
    assert_eq!(summary.events.get(&retreat.id).unwrap().balance, dec!(800.00));
    assert_eq!(summary.consolidated_total, dec!(1000.00));
    check_conservation(&summary, &snapshot.transactions).unwrap();

    // A finalized fund rejects further postings.
    events.finalize(retreat.id).await.unwrap();
    let rejected = tx_repo
        .create(CreateTransactionInput {
            kind: TransactionKind::Income,
            amount: dec!(50.00),
            transaction_date: date(2026, 7, 20),
            description: "Late registration".into(),
            category_id: income,
            event_id: Some(retreat.id),
            member_id: None,
            created_by: treasurer.id,
        })
        .await;
    assert!(matches!(rejected, Err(TransactionError::EventFinalized(_))));
}
