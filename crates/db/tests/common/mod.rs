//! Shared setup for the database integration tests.

#![allow(dead_code)]

use caja_core::ledger::{MovementDraft, Pool, RawAmount, TransferDraft};
use caja_db::migration::{Migrator, MigratorTrait};
use caja_db::repositories::{AccountRepository, CreateAccountInput};
use caja_shared::types::{AccountId, Currency, UserId};
use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};

/// Fresh in-memory database with every migration applied.
pub async fn setup() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Creates a bank account and returns its id.
pub async fn bank_account(
    db: &DatabaseConnection,
    user: UserId,
    name: &str,
    currency: Currency,
    initial: Option<&str>,
) -> AccountId {
    let account = AccountRepository::new(db.clone())
        .create_account(CreateAccountInput {
            user_id: user,
            name: Some(name.to_string()),
            institution: None,
            currency,
            initial_balance: initial.map(RawAmount::from),
        })
        .await
        .unwrap();
    AccountId::from_uuid(account.id)
}

pub fn draft(pool: Pool, amount: &str, currency: Option<&str>) -> MovementDraft {
    MovementDraft {
        pool,
        amount: RawAmount::from(amount),
        currency: currency.map(str::to_string),
        category_id: None,
        date: Some(date(2024, 1, 15)),
        note: None,
    }
}

pub fn dated(pool: Pool, amount: &str, currency: Option<&str>, on: NaiveDate) -> MovementDraft {
    MovementDraft {
        date: Some(on),
        ..draft(pool, amount, currency)
    }
}

pub fn transfer(from: Pool, to: Pool, amount: &str) -> TransferDraft {
    TransferDraft {
        from,
        to,
        amount: RawAmount::from(amount),
        currency: None,
        date: Some(date(2024, 1, 20)),
        note: None,
    }
}
