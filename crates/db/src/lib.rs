//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//! - The soft-delete predicate every read goes through
//! - In-process per-pool write locks

pub mod entities;
pub mod locks;
pub mod migration;
pub mod repositories;
pub mod soft_delete;

pub use locks::{PoolKey, PoolLocks};
pub use repositories::{
    AccountRepository, BalanceRepository, CategoryRepository, LedgerRepository,
    MovementRepository, ReportRepository,
};
pub use soft_delete::SoftDelete;

use std::time::Duration;

use caja_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    tracing::debug!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Connecting to database"
    );
    Database::connect(options).await
}
