//! Schema migration runner for the Caja ledger tables.
//!
//! Usage:
//!   migrator up      - Apply pending migrations
//!   migrator down    - Roll back the last migration
//!   migrator status  - List applied and pending migrations
//!   migrator fresh   - Drop every table and migrate from scratch
//!
//! The target database comes from `DATABASE_URL`.

use caja_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    cli::run_cli(Migrator).await;
}
