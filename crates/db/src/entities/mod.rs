//! `SeaORM` entities.
//!
//! Amounts are stored as `i64` minor units; currency, pool kind, and category
//! kind are stored as their lowercase or ISO codes and parsed on the way out.

pub mod accounts;
pub mod categories;
pub mod expenses;
pub mod incomes;
pub mod transfers;

use caja_core::ledger::{LedgerError, Pool, PoolKind};
use caja_shared::types::Currency;
use sea_orm::DbErr;
use uuid::Uuid;

/// Parses a stored currency code.
pub(crate) fn parse_currency(code: &str) -> Result<Currency, DbErr> {
    code.parse()
        .map_err(|err: String| DbErr::Type(format!("stored currency: {err}")))
}

/// Rebuilds a pool from its stored `kind` and `account_id` columns.
pub(crate) fn parse_pool(kind: &str, account_id: Option<Uuid>) -> Result<Pool, DbErr> {
    let kind: PoolKind = kind
        .parse()
        .map_err(|err: LedgerError| DbErr::Type(err.to_string()))?;
    Pool::from_parts(kind, account_id).map_err(|err| DbErr::Type(err.to_string()))
}
