//! Database seeder for Caja development and testing.
//!
//! Seeds an admin user, a few members, one event with its fund, and a
//! handful of transactions and transfers so the dashboard has something
//! to show on a fresh database.
//!
//! Usage: cargo run --bin seeder

use chrono::{NaiveDate, Utc};
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use caja_core::auth::hash_password;
use caja_db::entities::{
    categories, events, members,
    sea_orm_active_enums::{EventStatus, TransactionKind, UserRole},
    transactions, transfers, users,
};

/// Seed admin user ID (consistent for all seeds)
const ADMIN_USER_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Seed event ID (consistent for all seeds)
const RETREAT_EVENT_ID: &str = "00000000-0000-0000-0000-000000000010";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = caja_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding admin user...");
    seed_admin_user(&db).await;

    println!("Seeding members...");
    seed_members(&db).await;

    println!("Seeding retreat event...");
    seed_event(&db).await;

    println!("Seeding sample ledger...");
    seed_ledger(&db).await;

    println!("Seeding complete!");
}

fn admin_user_id() -> Uuid {
    Uuid::parse_str(ADMIN_USER_ID).expect("valid seed UUID")
}

fn retreat_event_id() -> Uuid {
    Uuid::parse_str(RETREAT_EVENT_ID).expect("valid seed UUID")
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid seed date")
}

/// Seeds the admin account (`admin@caja.dev` / `caja-admin`).
async fn seed_admin_user(db: &DatabaseConnection) {
    if users::Entity::find_by_id(admin_user_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Admin user already exists, skipping...");
        return;
    }

    let password_hash = hash_password("caja-admin").expect("password hashing");

    let user = users::ActiveModel {
        id: Set(admin_user_id()),
        email: Set("admin@caja.dev".to_string()),
        password_hash: Set(password_hash),
        full_name: Set("Caja Admin".to_string()),
        role: Set(UserRole::Admin),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = user.insert(db).await {
        eprintln!("Failed to insert admin user: {e}");
    } else {
        println!("  Created admin user: admin@caja.dev");
    }
}

/// Seeds a few members for the directory.
async fn seed_members(db: &DatabaseConnection) {
    let names = ["Ana Morales", "Luis Herrera", "Sofía Castillo"];

    for name in names {
        let existing = members::Entity::find()
            .filter(members::Column::FullName.eq(name))
            .one(db)
            .await
            .ok()
            .flatten();

        if existing.is_some() {
            println!("  Member {name} already exists, skipping...");
            continue;
        }

        let member = members::ActiveModel {
            id: Set(Uuid::now_v7()),
            full_name: Set(name.to_string()),
            phone: Set(None),
            email: Set(None),
            birth_date: Set(None),
            joined_at: Set(Some(date(2025, 1, 12))),
            notes: Set(None),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = member.insert(db).await {
            eprintln!("Failed to insert member {name}: {e}");
        } else {
            println!("  Created member: {name}");
        }
    }
}

/// Seeds the retreat event and its fund.
async fn seed_event(db: &DatabaseConnection) {
    if events::Entity::find_by_id(retreat_event_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Retreat event already exists, skipping...");
        return;
    }

    let event = events::ActiveModel {
        id: Set(retreat_event_id()),
        name: Set("Retiro de Verano".to_string()),
        description: Set(Some("Annual summer retreat".to_string())),
        starts_on: Set(date(2026, 7, 10)),
        ends_on: Set(Some(date(2026, 7, 13))),
        status: Set(EventStatus::Active),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = event.insert(db).await {
        eprintln!("Failed to insert retreat event: {e}");
    } else {
        println!("  Created event: Retiro de Verano");
    }
}

/// Seeds a small ledger: general offerings, retreat income and expenses,
/// and a transfer from General into the retreat fund.
async fn seed_ledger(db: &DatabaseConnection) {
    let existing = transactions::Entity::find().one(db).await.ok().flatten();
    if existing.is_some() {
        println!("  Ledger already has transactions, skipping...");
        return;
    }

    let Some(offerings) = find_category(db, "Ofrendas").await else {
        eprintln!("Category Ofrendas missing, run migrations first");
        return;
    };
    let Some(materials) = find_category(db, "Materiales").await else {
        eprintln!("Category Materiales missing, run migrations first");
        return;
    };

    let rows = [
        // General fund offerings
        (
            TransactionKind::Income,
            dec!(500.00),
            date(2026, 6, 7),
            "Sunday offering",
            offerings,
            None,
        ),
        // Retreat registrations and costs
        (
            TransactionKind::Income,
            dec!(800.00),
            date(2026, 6, 20),
            "Retreat registrations",
            offerings,
            Some(retreat_event_id()),
        ),
        (
            TransactionKind::Expense,
            dec!(250.00),
            date(2026, 7, 2),
            "Retreat supplies",
            materials,
            Some(retreat_event_id()),
        ),
    ];

    for (kind, amount, tx_date, description, category_id, event_id) in rows {
        let transaction = transactions::ActiveModel {
            id: Set(Uuid::now_v7()),
            kind: Set(kind),
            amount: Set(amount),
            transaction_date: Set(tx_date),
            description: Set(description.to_string()),
            category_id: Set(category_id),
            event_id: Set(event_id),
            member_id: Set(None),
            created_by: Set(admin_user_id()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = transaction.insert(db).await {
            eprintln!("Failed to insert transaction {description}: {e}");
        } else {
            println!("  Created transaction: {description}");
        }
    }

    let transfer = transfers::ActiveModel {
        id: Set(Uuid::now_v7()),
        amount: Set(dec!(150.00)),
        transfer_date: Set(date(2026, 6, 25)),
        description: Set("Seed money for retreat".to_string()),
        from_event_id: Set(None),
        to_event_id: Set(Some(retreat_event_id())),
        created_by: Set(admin_user_id()),
        created_at: Set(Utc::now().into()),
    };

    if let Err(e) = transfer.insert(db).await {
        eprintln!("Failed to insert transfer: {e}");
    } else {
        println!("  Created transfer: General -> Retiro de Verano");
    }
}

async fn find_category(db: &DatabaseConnection, name: &str) -> Option<Uuid> {
    categories::Entity::find()
        .filter(categories::Column::Name.eq(name))
        .one(db)
        .await
        .ok()
        .flatten()
        .map(|category| category.id)
}
