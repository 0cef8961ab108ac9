//! Demo data seeder for Caja development.
//!
//! Creates one demo user with two bank accounts, a few categories, and a
//! couple of months of movements, all written through the repositories so
//! every balance rule applies.
//!
//! Usage: cargo run --bin seeder

use caja_core::currency::CurrencyConverter;
use caja_core::ledger::{CategoryKind, MovementDraft, Pool, RawAmount, TransferDraft};
use caja_core::reports::ReportRequest;
use caja_db::PoolLocks;
use caja_db::migration::{Migrator, MigratorTrait};
use caja_db::repositories::{
    AccountRepository, CategoryRepository, CreateAccountInput, CreateCategoryInput,
    MovementRepository, ReportRepository,
};
use caja_shared::AppConfig;
use caja_shared::types::{AccountId, CategoryId, Currency, UserId};
use chrono::NaiveDate;
use sea_orm_migration::sea_orm::DatabaseConnection;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Demo user ID (stable across runs)
const DEMO_USER_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0001);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "caja=debug,seeder=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    let db = caja_db::connect(&config.database).await?;
    Migrator::up(&db, None).await?;
    info!("Connected and migrated");

    let user = UserId::from_uuid(DEMO_USER_ID);
    let locks = PoolLocks::new();
    let accounts = AccountRepository::with_locks(db.clone(), locks.clone());

    if !accounts.list_accounts(user).await?.is_empty() {
        info!(user_id = %user, "Demo data already present, skipping");
        return Ok(());
    }

    let (cordobas, dollars) = seed_accounts(&accounts, user).await?;
    let (salary, groceries) = seed_categories(&db, user).await?;
    seed_movements(
        &MovementRepository::with_locks(db.clone(), locks),
        user,
        cordobas,
        dollars,
        salary,
        groceries,
    )
    .await?;

    let fx = CurrencyConverter::from_config(&config.ledger)?;
    let summary = ReportRepository::new(db, fx)
        .summarize(user, &ReportRequest::default())
        .await?;
    info!(
        total = %summary.totals_by_pool_kind.total,
        bank = %summary.totals_by_pool_kind.bank,
        cash = %summary.totals_by_pool_kind.cash,
        months = summary.monthly.len(),
        "Seeding complete"
    );
    Ok(())
}

async fn seed_accounts(
    repo: &AccountRepository,
    user: UserId,
) -> anyhow::Result<(AccountId, AccountId)> {
    let cordobas = repo
        .create_account(CreateAccountInput {
            user_id: user,
            name: Some("Cuenta corriente".to_string()),
            institution: Some("Banco Demo".to_string()),
            currency: Currency::Nio,
            initial_balance: Some(RawAmount::from("15000")),
        })
        .await?;
    let dollars = repo
        .create_account(CreateAccountInput {
            user_id: user,
            name: Some("Ahorro".to_string()),
            institution: Some("Banco Demo".to_string()),
            currency: Currency::Usd,
            initial_balance: Some(RawAmount::from("500")),
        })
        .await?;

    info!(user_id = %user, "Seeded accounts");
    Ok((
        AccountId::from_uuid(cordobas.id),
        AccountId::from_uuid(dollars.id),
    ))
}

async fn seed_categories(
    db: &DatabaseConnection,
    user: UserId,
) -> anyhow::Result<(CategoryId, CategoryId)> {
    let repo = CategoryRepository::new(db.clone());
    let category = |name: &str, kind| CreateCategoryInput {
        user_id: user,
        name: name.to_string(),
        kind,
    };

    let salary = repo
        .create_category(category("Salario", CategoryKind::Income))
        .await?;
    let groceries = repo
        .create_category(category("Supermercado", CategoryKind::Expense))
        .await?;
    repo.create_category(category("Transporte", CategoryKind::Expense))
        .await?;

    info!(user_id = %user, "Seeded categories");
    Ok((
        CategoryId::from_uuid(salary.id),
        CategoryId::from_uuid(groceries.id),
    ))
}

async fn seed_movements(
    repo: &MovementRepository,
    user: UserId,
    cordobas: AccountId,
    dollars: AccountId,
    salary: CategoryId,
    groceries: CategoryId,
) -> anyhow::Result<()> {
    let movement = |pool, amount: &str, category, date, note: &str| MovementDraft {
        pool,
        amount: RawAmount::from(amount),
        currency: None,
        category_id: category,
        date,
        note: Some(note.to_string()),
    };

    for month in 1..=2 {
        let payday = NaiveDate::from_ymd_opt(2024, month, 1);
        let shopping = NaiveDate::from_ymd_opt(2024, month, 12);

        repo.create_income(
            user,
            movement(Pool::Bank(cordobas), "25000", Some(salary), payday, "Salario"),
        )
        .await?;
        repo.create_expense(
            user,
            movement(
                Pool::Bank(cordobas),
                "4200.50",
                Some(groceries),
                shopping,
                "Compras del mes",
            ),
        )
        .await?;
        repo.create_transfer(
            user,
            TransferDraft {
                from: Pool::Bank(cordobas),
                to: Pool::Cash,
                amount: RawAmount::from("2000"),
                currency: None,
                date: shopping,
                note: Some("Retiro en cajero".to_string()),
            },
        )
        .await?;
    }

    repo.create_income(
        user,
        MovementDraft {
            currency: Some("USD".to_string()),
            ..movement(
                Pool::Cash,
                "100",
                None,
                NaiveDate::from_ymd_opt(2024, 2, 20),
                "Regalo",
            )
        },
    )
    .await?;
    repo.create_expense(
        user,
        movement(
            Pool::Bank(dollars),
            "45",
            None,
            NaiveDate::from_ymd_opt(2024, 2, 25),
            "Suscripciones",
        ),
    )
    .await?;

    info!(user_id = %user, "Seeded movements");
    Ok(())
}
