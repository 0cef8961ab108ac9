//! Ledger reader: every live movement touching one pool in one currency.

use caja_core::ledger::{Ledger, LedgerRow, Pool, PoolKind};
use caja_shared::types::{Currency, UserId};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};
use tracing::debug;

use crate::entities::{expenses, incomes, transfers};
use crate::soft_delete::SoftDelete;

/// Repository reading a pool's ledger.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads the ledger of `pool` in `currency` for `user`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn load_ledger(
        &self,
        user: UserId,
        pool: Pool,
        currency: Currency,
    ) -> Result<Ledger, DbErr> {
        Self::load_on(&self.db, user, pool, currency).await
    }

    /// Same as [`LedgerRepository::load_ledger`], on any connection.
    ///
    /// Writers call this with their open transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn load_on<C: ConnectionTrait>(
        conn: &C,
        user: UserId,
        pool: Pool,
        currency: Currency,
    ) -> Result<Ledger, DbErr> {
        let code = currency.code();

        let incomes = incomes::Entity::find_live_owned(user)
            .filter(incomes::Column::Currency.eq(code))
            .filter(on_pool(incomes::Column::Kind, incomes::Column::AccountId, pool))
            .order_by_asc(incomes::Column::Date)
            .all(conn)
            .await?;

        let expenses = expenses::Entity::find_live_owned(user)
            .filter(expenses::Column::Currency.eq(code))
            .filter(on_pool(expenses::Column::Kind, expenses::Column::AccountId, pool))
            .order_by_asc(expenses::Column::Date)
            .all(conn)
            .await?;

        let transfers_out = transfers::Entity::find_live_owned(user)
            .filter(transfers::Column::Currency.eq(code))
            .filter(on_pool(
                transfers::Column::FromKind,
                transfers::Column::FromAccountId,
                pool,
            ))
            .order_by_asc(transfers::Column::Date)
            .all(conn)
            .await?;

        let transfers_in = transfers::Entity::find_live_owned(user)
            .filter(transfers::Column::Currency.eq(code))
            .filter(on_pool(
                transfers::Column::ToKind,
                transfers::Column::ToAccountId,
                pool,
            ))
            .order_by_asc(transfers::Column::Date)
            .all(conn)
            .await?;

        let ledger = Ledger {
            incomes: rows(incomes.iter().map(incomes::Model::ledger_row))?,
            expenses: rows(expenses.iter().map(expenses::Model::ledger_row))?,
            transfers_out: rows(transfers_out.iter().map(transfers::Model::ledger_row))?,
            transfers_in: rows(transfers_in.iter().map(transfers::Model::ledger_row))?,
        };

        debug!(
            user_id = %user,
            pool = %pool,
            currency = %currency,
            rows = ledger.len(),
            "Ledger loaded"
        );
        Ok(ledger)
    }
}

/// Rows stored on `pool`: `kind = 'cash' AND account_id IS NULL`, or
/// `kind = 'bank' AND account_id = id`.
pub(crate) fn on_pool<C: ColumnTrait>(kind: C, account_id: C, pool: Pool) -> Condition {
    match pool {
        Pool::Cash => Condition::all()
            .add(kind.eq(PoolKind::Cash.as_str()))
            .add(account_id.is_null()),
        Pool::Bank(id) => Condition::all()
            .add(kind.eq(PoolKind::Bank.as_str()))
            .add(account_id.eq(id.into_inner())),
    }
}

fn rows(iter: impl Iterator<Item = Result<LedgerRow, DbErr>>) -> Result<Vec<LedgerRow>, DbErr> {
    iter.collect()
}
